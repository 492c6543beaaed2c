//! One-shot flag guarding against reload loops

use crate::config::{REFRESH_MARKER_KEY, REFRESH_MARKER_VALUE};
use crate::storage::KeyValueStore;
use crate::storage::error::StoreError;

/// Flag recording that a forced reload was already triggered.
///
/// Set right before a reload; consumed by [`RefreshMarker::take`] on the next
/// load, so it never outlives one reload cycle.
pub struct RefreshMarker<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> RefreshMarker<S> {
    /// Marker stored under the default key
    pub fn new(store: S) -> Self {
        Self::with_key(store, REFRESH_MARKER_KEY)
    }

    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// An empty stored value does not count as set
    pub fn is_set(&self) -> Result<bool, StoreError> {
        Ok(self
            .store
            .get(&self.key)?
            .is_some_and(|value| !value.is_empty()))
    }

    pub fn set(&self) -> Result<(), StoreError> {
        self.store.set(&self.key, REFRESH_MARKER_VALUE)
    }

    /// Reads the marker and deletes it whenever the key exists.
    ///
    /// Returns whether the marker was set.
    pub fn take(&self) -> Result<bool, StoreError> {
        let Some(value) = self.store.get(&self.key)? else {
            return Ok(false);
        };

        self.store.remove(&self.key)?;

        Ok(!value.is_empty())
    }
}
