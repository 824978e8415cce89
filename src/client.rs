//! Request orchestrator that ties the store, transport, refresher, and notifier together.

mod dispatch;
mod recovery;

// self
use crate::{
	_prelude::*,
	config::ClientConfig,
	notify::{ErrorNotifier, LogNotifier},
	refresh::{RefreshMetrics, TokenRefresher},
	store::TokenStore,
	transport::HttpTransport,
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, refresh::EndpointRefresher, transport::ReqwestTransport};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestTransport>;

/// Issues API calls with the stored bearer credential and recovers from expired tokens.
///
/// Every collaborator is injected: the token store handle, the HTTP transport, the refresh
/// collaborator, and the notifier. The client never caches the token record; each dispatch
/// reads the store, so all clones (and all other holders of the same store) observe the latest
/// persisted value.
pub struct ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Validated client settings.
	pub config: ClientConfig,
	/// Transport used for every outbound call.
	pub transport: Arc<T>,
	/// Handle to the canonical token record.
	pub store: TokenStore,
	/// Collaborator that exchanges refresh secrets for new records.
	pub refresher: Arc<dyn TokenRefresher>,
	/// Surface for user-facing failure messages.
	pub notifier: Arc<dyn ErrorNotifier>,
	/// Counters for refresh calls made by this client and its clones.
	pub refresh_metrics: Arc<RefreshMetrics>,
	refresh_guard: Arc<AsyncMutex<Option<recovery::LapsedSession>>>,
}
impl<T> ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a client around caller-provided collaborators, notifying through [`LogNotifier`].
	pub fn with_transport(
		config: ClientConfig,
		transport: impl Into<Arc<T>>,
		store: TokenStore,
		refresher: Arc<dyn TokenRefresher>,
	) -> Self {
		Self {
			config,
			transport: transport.into(),
			store,
			refresher,
			notifier: Arc::new(LogNotifier),
			refresh_metrics: Default::default(),
			refresh_guard: Default::default(),
		}
	}

	/// Replaces the notifier.
	pub fn with_notifier(mut self, notifier: Arc<dyn ErrorNotifier>) -> Self {
		self.notifier = notifier;

		self
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestTransport> {
	/// Creates a reqwest-backed client whose refresher posts to `refresh_path`.
	///
	/// The refresher shares the client's transport, so both use the same connection pool.
	pub fn new(
		config: ClientConfig,
		store: TokenStore,
		refresh_path: &str,
	) -> Result<Self, ConfigError> {
		Self::with_reqwest_client(config, store, refresh_path, ReqwestClient::default())
	}

	/// Same as [`ApiClient::new`] but reuses a preconfigured reqwest client (timeouts, proxies).
	pub fn with_reqwest_client(
		config: ClientConfig,
		store: TokenStore,
		refresh_path: &str,
		client: ReqwestClient,
	) -> Result<Self, ConfigError> {
		let transport = Arc::new(ReqwestTransport::with_client(client));
		let refresher = <EndpointRefresher<ReqwestTransport>>::from_config(
			transport.clone(),
			&config,
			refresh_path,
		)?;

		Ok(Self::with_transport(config, transport, store, Arc::new(refresher)))
	}
}
impl<T> Clone for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			transport: self.transport.clone(),
			store: self.store.clone(),
			refresher: self.refresher.clone(),
			notifier: self.notifier.clone(),
			refresh_metrics: self.refresh_metrics.clone(),
			refresh_guard: self.refresh_guard.clone(),
		}
	}
}
impl<T> Debug for ApiClient<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("config", &self.config)
			.field("store", &self.store)
			.finish_non_exhaustive()
	}
}
