//! Thread-safe in-memory [`KeyValueStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{KeyValueStore, StoreError},
};

/// Thread-safe storage backend that keeps values in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<RwLock<HashMap<String, String>>>);
impl MemoryStore {
	/// Number of keys currently stored.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl KeyValueStore for MemoryStore {
	fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
		Ok(self.0.read().get(key).cloned())
	}

	fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
		self.0.write().insert(key.to_owned(), value);

		Ok(())
	}

	fn remove(&self, key: &str) -> Result<(), StoreError> {
		self.0.write().remove(key);

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn clones_share_state() {
		let store = MemoryStore::default();
		let other = store.clone();

		store.set("k", "v".into()).expect("Write should succeed.");

		assert_eq!(other.get("k").expect("Read should succeed."), Some("v".into()));
		assert_eq!(other.len(), 1);

		other.remove("k").expect("Remove should succeed.");
		other.remove("k").expect("Removing a missing key should succeed.");

		assert!(store.is_empty());
	}
}
