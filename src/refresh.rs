//! Refresh collaborator contract and its HTTP implementation.
//!
//! The client hands the stored refresh secret to a [`TokenRefresher`] once it has decided a
//! refresh is warranted. The refresher only talks to the token endpoint; persisting the new
//! record, clearing credentials on failure, and retrying the original request stay with the
//! client.

mod stats;

pub use stats::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	auth::TokenRecord,
	config::ClientConfig,
	error::ConfigError,
	transport::{HttpTransport, TransportRequest},
};

/// Boxed future returned by [`TokenRefresher::refresh`].
pub type RefreshFuture<'a> = Pin<Box<dyn Future<Output = Result<RefreshOutcome>> + 'a + Send>>;

/// Exchanges a refresh secret for a new token record.
pub trait TokenRefresher
where
	Self: Send + Sync,
{
	/// Calls the refresh endpoint with `refresh_token`.
	///
	/// `Err` and an outcome with `success == false` are both treated as a failed refresh.
	fn refresh<'a>(&'a self, refresh_token: &'a str) -> RefreshFuture<'a>;
}

/// Body returned by the refresh endpoint: `{success, data}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshOutcome {
	/// Whether the endpoint issued a new record.
	#[serde(default)]
	pub success: bool,
	/// New token record, present on success.
	#[serde(default)]
	pub data: Option<TokenRecord>,
}
impl RefreshOutcome {
	/// Successful outcome carrying `record`.
	pub fn issued(record: TokenRecord) -> Self {
		Self { success: true, data: Some(record) }
	}

	/// Outcome for an endpoint that answered but declined to issue a record.
	pub fn declined() -> Self {
		Self { success: false, data: None }
	}

	/// Returns the new record only when the endpoint reported success and included one.
	pub fn into_record(self) -> Option<TokenRecord> {
		if self.success { self.data } else { None }
	}
}

/// [`TokenRefresher`] that posts `{"refreshToken": ..}` to an HTTP endpoint.
///
/// The call never carries a bearer credential and never triggers a nested refresh.
pub struct EndpointRefresher<T>
where
	T: ?Sized + HttpTransport,
{
	transport: Arc<T>,
	url: Url,
}
impl<T> EndpointRefresher<T>
where
	T: ?Sized + HttpTransport,
{
	/// Creates a refresher posting to the absolute `url`.
	pub fn new(transport: impl Into<Arc<T>>, url: Url) -> Self {
		Self { transport: transport.into(), url }
	}

	/// Creates a refresher posting to `path`, resolved against the client's base URL.
	pub fn from_config(
		transport: impl Into<Arc<T>>,
		config: &ClientConfig,
		path: &str,
	) -> Result<Self, ConfigError> {
		Ok(Self::new(transport, config.resolve(path)?))
	}

	/// Endpoint the refresher posts to.
	pub fn url(&self) -> &Url {
		&self.url
	}

	async fn call(&self, refresh_token: &str) -> Result<RefreshOutcome> {
		let request = TransportRequest {
			method: http::Method::POST,
			url: self.url.clone(),
			query: Vec::new(),
			headers: http::HeaderMap::new(),
			body: Some(serde_json::json!({ "refreshToken": refresh_token })),
		};
		let response = self.transport.send(request).await?;
		let status = response.status;

		if status != 200 {
			return Err(Error::Api { status, message: response.server_message() });
		}

		serde_path_to_error::deserialize(response.body)
			.map_err(|source| Error::Decode { status, source })
	}
}
impl<T> TokenRefresher for EndpointRefresher<T>
where
	T: ?Sized + HttpTransport,
{
	fn refresh<'a>(&'a self, refresh_token: &'a str) -> RefreshFuture<'a> {
		Box::pin(self.call(refresh_token))
	}
}
impl<T> Debug for EndpointRefresher<T>
where
	T: ?Sized + HttpTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("EndpointRefresher").field("url", &self.url.as_str()).finish()
	}
}
