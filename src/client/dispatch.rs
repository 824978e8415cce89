//! Request dispatch loop and failure reporting.
//!
//! One call walks `INIT -> AUTH_ATTACHED -> DISPATCHED` and ends in success, a direct failure,
//! or a 401. A 401 on an authenticated request is handed to the recovery step, which either
//! asks for a retry (back to `INIT`, bounded by `max_auth_retries`) or yields the failure to
//! report. Every path ends in exactly one envelope or one `Err`.

// crates.io
use http::header::AUTHORIZATION;
// self
use crate::{
	_prelude::*,
	auth::TokenRecord,
	client::{ApiClient, recovery::Recovery},
	error::ConfigError,
	obs::{self, FlowKind, FlowOutcome, FlowSpan, flow_event},
	path,
	request::RequestDescriptor,
	response::ApiResponse,
	transport::{HttpTransport, TransportRequest},
};

const UNAUTHORIZED: u16 = 401;

impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Issues the request described by `descriptor`.
	///
	/// A 200 response yields [`ApiResponse::Success`] with the body's `data` field decoded into
	/// `D`. Everything else is reported according to the descriptor's policy flags: the notifier
	/// is called unless `silent_error` is set, then the failure is returned as `Err` when
	/// `throw_error` is set and as [`ApiResponse::Failure`] otherwise.
	pub async fn request<D>(&self, descriptor: RequestDescriptor) -> Result<ApiResponse<D>>
	where
		D: DeserializeOwned,
	{
		const KIND: FlowKind = FlowKind::Request;

		let span = FlowSpan::new(KIND, "request").with_target(&descriptor.method, &descriptor.url);

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span.instrument(self.run(&descriptor, &span)).await;

		match &result {
			Ok(ApiResponse::Success { .. }) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			_ => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	async fn run<D>(&self, descriptor: &RequestDescriptor, span: &FlowSpan) -> Result<ApiResponse<D>>
	where
		D: DeserializeOwned,
	{
		let mut retries_left = self.config.max_auth_retries;
		let mut attempt = 0_u8;

		loop {
			span.record_attempt(attempt);

			let credential = self.credential_for(descriptor);
			let err = match self.dispatch(descriptor, credential.as_ref()).await {
				Ok(data) => return Ok(ApiResponse::Success { data }),
				Err(err) => err,
			};

			// Only a server 401 enters the protocol; the fixed refresh failures never loop back.
			if descriptor.ignore_auth || !matches!(err, Error::Api { status: UNAUTHORIZED, .. }) {
				return self.report(descriptor, err);
			}
			if retries_left == 0 {
				flow_event!(warn, attempt = %attempt, "retry budget exhausted; reporting 401 as-is");

				return self.report(descriptor, err);
			}

			match self.recover_unauthorized(credential.as_ref()).await {
				Recovery::Retry => {
					retries_left -= 1;
					attempt = attempt.saturating_add(1);

					obs::record_flow_outcome(FlowKind::Request, FlowOutcome::Retry);
				},
				Recovery::NotNeeded => return self.report(descriptor, err),
				Recovery::Terminal(terminal) => return self.report(descriptor, terminal),
			}
		}
	}

	/// Reads the token to send with this attempt, unless the descriptor opts out.
	fn credential_for(&self, descriptor: &RequestDescriptor) -> Option<TokenRecord> {
		if descriptor.ignore_auth {
			return None;
		}

		match self.store.get() {
			Ok(token) => token,
			Err(e) => {
				flow_event!(warn, error = %e, "token store unreadable; sending without credential");

				None
			},
		}
	}

	async fn dispatch<D>(
		&self,
		descriptor: &RequestDescriptor,
		credential: Option<&TokenRecord>,
	) -> Result<D>
	where
		D: DeserializeOwned,
	{
		let mut headers = descriptor.headers.clone();

		if let Some(token) = credential {
			headers.insert(AUTHORIZATION, token.bearer_header().map_err(ConfigError::from)?);
		}

		let resolved = match descriptor.path_vars.as_ref() {
			Some(vars) => path::substitute_path(&descriptor.url, vars),
			None => descriptor.url.clone(),
		};
		let url = self.config.resolve(&resolved)?;
		let response = self
			.transport
			.send(TransportRequest {
				method: descriptor.method.clone(),
				url,
				query: descriptor.query.clone(),
				headers,
				body: descriptor.body.clone(),
			})
			.await?;
		let status = response.status;

		if status != 200 {
			return Err(Error::Api { status, message: response.server_message() });
		}

		let data = match response.body {
			JsonValue::Object(mut body) => body.remove("data").unwrap_or(JsonValue::Null),
			_ => JsonValue::Null,
		};

		serde_path_to_error::deserialize(data).map_err(|source| Error::Decode { status, source })
	}

	/// Applies the descriptor's notification and propagation policy to a failure.
	fn report<D>(&self, descriptor: &RequestDescriptor, err: Error) -> Result<ApiResponse<D>> {
		flow_event!(debug, status = ?err.status(), error = %err, "request failed");

		if !descriptor.silent_error {
			let message =
				err.notice().unwrap_or_else(|| self.config.default_error_message.clone());

			self.notifier.show_error(&message);
		}

		if descriptor.throw_error { Err(err) } else { Ok(ApiResponse::from_error(&err)) }
	}
}

