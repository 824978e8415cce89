//! Bearer-authenticated API client that templates request paths, attaches the stored access
//! token, and transparently refreshes and retries once the token has expired.

#![deny(clippy::all, missing_docs)]
#![cfg_attr(not(test), deny(unused_crate_dependencies))]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod obs;
pub mod path;
pub mod refresh;
pub mod request;
pub mod response;
pub mod store;
pub mod transport;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::TokenRecord,
		client::ApiClient,
		config::ClientConfig,
		notify::ErrorNotifier,
		refresh::EndpointRefresher,
		store::{MemoryStore, TokenStore},
		transport::ReqwestTransport,
	};

	/// Client type alias used by reqwest-backed integration tests.
	pub type ReqwestTestClient = ApiClient<ReqwestTransport>;

	/// Path of the refresh endpoint served by the mock servers in integration tests.
	pub const TEST_REFRESH_PATH: &str = "/auth/refresh";

	/// Notifier that records every message it is asked to show.
	#[derive(Clone, Debug, Default)]
	pub struct RecordingNotifier(Arc<Mutex<Vec<String>>>);
	impl RecordingNotifier {
		/// Returns a snapshot of the recorded messages.
		pub fn messages(&self) -> Vec<String> {
			self.0.lock().clone()
		}
	}
	impl ErrorNotifier for RecordingNotifier {
		fn show_error(&self, message: &str) {
			self.0.lock().push(message.to_owned());
		}
	}

	/// Builds a token record whose expiries sit at the provided offsets from now.
	pub fn token_expiring_in(
		access: &str,
		refresh: &str,
		access_ttl: Duration,
		refresh_ttl: Duration,
	) -> TokenRecord {
		let now = OffsetDateTime::now_utc();

		TokenRecord::new(access, refresh, now + access_ttl, now + refresh_ttl)
	}

	/// Constructs an [`ApiClient`] pointed at `base_url`, backed by an in-memory store, a
	/// recording notifier, and an endpoint refresher served at [`TEST_REFRESH_PATH`].
	pub fn build_reqwest_test_client(
		base_url: &str,
	) -> (ReqwestTestClient, Arc<MemoryStore>, RecordingNotifier) {
		let config = ClientConfig::builder()
			.base_url(Url::parse(base_url).expect("Mock server URL should parse."))
			.build()
			.expect("Test client configuration should be valid.");
		let backend = Arc::new(MemoryStore::default());
		let store = TokenStore::new(backend.clone());
		let transport = Arc::new(ReqwestTransport::default());
		let refresher = <EndpointRefresher<ReqwestTransport>>::from_config(
			transport.clone(),
			&config,
			TEST_REFRESH_PATH,
		)
		.expect("Test refresh path should resolve.");
		let notifier = RecordingNotifier::default();
		let client = ApiClient::with_transport(config, transport, store, Arc::new(refresher))
			.with_notifier(Arc::new(notifier.clone()));

		(client, backend, notifier)
	}
}

mod _prelude {
	#[cfg(test)]
	pub use std::error::Error as StdError;
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	#[cfg(any(test, all(feature = "test", feature = "reqwest")))]
	pub use parking_lot::Mutex;
	#[cfg(feature = "reqwest")]
	pub use reqwest::Client as ReqwestClient;
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use serde_json::Value as JsonValue;
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	#[cfg(any(test, all(feature = "test", feature = "reqwest")))]
	pub use time::Duration;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use http::{HeaderMap, HeaderValue, Method};
#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
