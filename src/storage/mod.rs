//! Client-local key/value storage
//!
//! The refresh marker lives in a [`KeyValueStore`] handed to the controller,
//! so several controllers (or tests) can run side by side with separate
//! stores or keys.
//!
//! # Modules
//!
//! - [`sqlite`]: SQLite-backed store that survives restarts
//! - [`memory`]: in-process store
//! - [`marker`]: the one-shot refresh marker on top of a store
//! - [`error`]: error type for store operations

use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

pub mod error;
pub mod marker;
pub mod memory;
pub mod sqlite;

use crate::storage::error::StoreError;

/// String key/value storage, in the manner of a browser's local storage
#[cfg_attr(test, automock)]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Deletes `key`; deleting a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
