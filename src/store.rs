//! Token persistence over a string-valued key-value backend.
//!
//! [`KeyValueStore`] is the raw storage seam (an origin-scoped local storage in a browser, a
//! JSON file on disk, a map in tests). [`TokenStore`] layers the single token record on top of
//! it and only handles serialization; it never validates the record it is given.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::TokenRecord};

/// Key under which the token record is stored unless overridden.
pub const DEFAULT_TOKEN_KEY: &str = "token";

/// Synchronous string-valued key-value storage.
pub trait KeyValueStore
where
	Self: Send + Sync,
{
	/// Returns the value stored under `key`, if any.
	fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

	/// Stores `value` under `key`, replacing any previous value.
	fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

	/// Removes `key`; removing a missing key is not an error.
	fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Error type produced by [`KeyValueStore`] implementations and [`TokenStore`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced while encoding or decoding a stored value.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Handle to the single canonical token record.
///
/// Cloning the handle shares the backend; every read goes to the backend so callers always
/// observe the latest persisted value.
#[derive(Clone)]
pub struct TokenStore {
	backend: Arc<dyn KeyValueStore>,
	key: String,
}
impl TokenStore {
	/// Wraps `backend`, storing the record under [`DEFAULT_TOKEN_KEY`].
	pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
		Self { backend, key: DEFAULT_TOKEN_KEY.into() }
	}

	/// Overrides the key the record is stored under.
	pub fn with_key(mut self, key: impl Into<String>) -> Self {
		self.key = key.into();

		self
	}

	/// Storage key in use.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Reads the current token record.
	pub fn get(&self) -> Result<Option<TokenRecord>, StoreError> {
		let Some(raw) = self.backend.get(&self.key)? else {
			return Ok(None);
		};

		serde_json::from_str(&raw).map(Some).map_err(|e| StoreError::Serialization {
			message: format!("Failed to decode token stored under `{}`: {e}", self.key),
		})
	}

	/// Replaces the stored token record wholesale.
	pub fn set(&self, record: &TokenRecord) -> Result<(), StoreError> {
		let raw = serde_json::to_string(record).map_err(|e| StoreError::Serialization {
			message: format!("Failed to encode token record: {e}"),
		})?;

		self.backend.set(&self.key, raw)
	}

	/// Removes the stored token record.
	pub fn delete(&self) -> Result<(), StoreError> {
		self.backend.remove(&self.key)
	}
}
impl Debug for TokenStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenStore").field("key", &self.key).finish_non_exhaustive()
	}
}
