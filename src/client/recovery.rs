//! Refresh-and-retry protocol engaged after a 401 on an authenticated request.
//!
//! The stored token is re-read (another task may have replaced it since dispatch) and checked
//! against both expiry predicates:
//!
//! - missing or still valid: the 401 is not a credential lapse; report it unchanged;
//! - refresh token lapsed: clear the store and fail with the fixed "refresh token expired" error;
//! - otherwise refresh: on success persist the new record and retry, on failure clear the store
//!   and fail with the fixed "refresh failed" error.
//!
//! In [`RefreshCoordination::SingleFlight`] mode the whole step runs behind the client's refresh
//! guard. A waiter that finds a fresh record stored by another task retries with it instead of
//! refreshing again; a waiter whose credential was just given up by another task's failed refresh
//! receives the same terminal error that task reported.

// self
use crate::{
	_prelude::*,
	auth::{TokenRecord, TokenSecret},
	client::ApiClient,
	config::RefreshCoordination,
	obs::{self, FlowKind, FlowOutcome, FlowSpan, flow_event},
	refresh::RefreshOutcome,
	transport::HttpTransport,
};

/// Decision taken after a 401.
#[derive(Debug)]
pub(super) enum Recovery {
	/// A usable record is stored; dispatch the request again.
	Retry,
	/// The token does not look expired; report the original failure.
	NotNeeded,
	/// Credentials are unusable; report this error instead.
	Terminal(Error),
}

/// Credential given up by the last failed single-flight refresh.
#[derive(Debug)]
pub(super) struct LapsedSession {
	access: TokenSecret,
	refresh_expired: bool,
}
impl LapsedSession {
	fn from_terminal(sent: &TokenRecord, err: &Error) -> Option<Self> {
		err.is_auth_terminal().then(|| Self {
			access: sent.access.clone(),
			refresh_expired: matches!(err, Error::RefreshTokenExpired),
		})
	}

	/// Terminal error to report for a request that carried `sent`, if it belonged to this session.
	fn replay(&self, sent: &TokenRecord) -> Option<Error> {
		if sent.access != self.access {
			return None;
		}

		Some(if self.refresh_expired {
			Error::RefreshTokenExpired
		} else {
			Error::RefreshFailed { source: None }
		})
	}
}

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Runs the refresh protocol; `sent` is the record the failed attempt carried, if any.
	pub(super) async fn recover_unauthorized(&self, sent: Option<&TokenRecord>) -> Recovery {
		match self.config.refresh_coordination {
			RefreshCoordination::Independent => self.refresh_if_expired().await,
			RefreshCoordination::SingleFlight => {
				let mut lapsed = self.refresh_guard.lock().await;

				if self.replaced_while_waiting(sent) {
					self.refresh_metrics.record_reuse();

					flow_event!(debug, "reusing token refreshed by a concurrent request");

					return Recovery::Retry;
				}
				if let Some(err) =
					sent.zip(lapsed.as_ref()).and_then(|(sent, lapsed)| lapsed.replay(sent))
				{
					flow_event!(debug, "session already lapsed in a concurrent refresh");

					return Recovery::Terminal(err);
				}

				let recovery = self.refresh_if_expired().await;

				match (&recovery, sent) {
					(Recovery::Terminal(err), Some(sent)) =>
						if let Some(session) = LapsedSession::from_terminal(sent, err) {
							*lapsed = Some(session);
						},
					(Recovery::Retry, _) => *lapsed = None,
					_ => {},
				}

				recovery
			},
		}
	}

	/// Returns `true` when the store now holds a different, unexpired record than the one sent.
	fn replaced_while_waiting(&self, sent: Option<&TokenRecord>) -> bool {
		let Some(sent) = sent else {
			return false;
		};

		match self.store.get() {
			Ok(Some(current)) =>
				current.access != sent.access
					&& !current.is_access_or_refresh_expired_at(OffsetDateTime::now_utc()),
			_ => false,
		}
	}

	async fn refresh_if_expired(&self) -> Recovery {
		let now = OffsetDateTime::now_utc();
		let token = match self.store.get() {
			Ok(Some(token)) => token,
			Ok(None) => return Recovery::NotNeeded,
			Err(e) => {
				flow_event!(warn, error = %e, "token store unreadable after 401");

				return Recovery::NotNeeded;
			},
		};

		if !token.is_access_or_refresh_expired_at(now) {
			flow_event!(debug, "401 with an unexpired token; not refreshing");

			return Recovery::NotNeeded;
		}
		if token.is_refresh_expired_at(now) {
			flow_event!(info, "refresh token expired; clearing stored credentials");
			self.clear_credentials();

			return Recovery::Terminal(Error::RefreshTokenExpired);
		}

		match self.call_refresher(&token).await {
			Ok(Some(record)) => match self.store.set(&record) {
				Ok(()) => Recovery::Retry,
				Err(e) => Recovery::Terminal(e.into()),
			},
			Ok(None) => {
				flow_event!(info, "refresh declined; clearing stored credentials");
				self.clear_credentials();

				Recovery::Terminal(Error::RefreshFailed { source: None })
			},
			Err(e) => {
				flow_event!(info, error = %e, "refresh failed; clearing stored credentials");
				self.clear_credentials();

				Recovery::Terminal(Error::RefreshFailed { source: Some(Box::new(e)) })
			},
		}
	}

	/// Calls the refresher once, recording metrics; `Ok(None)` means the endpoint declined.
	async fn call_refresher(&self, token: &TokenRecord) -> Result<Option<TokenRecord>> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.refresh_metrics.record_attempt();

		let result = span
			.instrument(self.refresher.refresh(token.refresh.expose()))
			.await
			.map(RefreshOutcome::into_record);

		match &result {
			Ok(Some(_)) => {
				obs::record_flow_outcome(KIND, FlowOutcome::Success);
				self.refresh_metrics.record_success();
			},
			_ => {
				obs::record_flow_outcome(KIND, FlowOutcome::Failure);
				self.refresh_metrics.record_failure();
			},
		}

		result
	}

	fn clear_credentials(&self) {
		if let Err(e) = self.store.delete() {
			flow_event!(warn, error = %e, "failed to clear stored credentials");
		}
	}
}
