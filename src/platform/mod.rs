//! Platform capabilities the controller drives but does not own
//!
//! # Modules
//!
//! - [`cache_storage`]: enumerating and deleting cache buckets
//! - [`reload`]: requesting a full reload of the client
//! - [`error`]: error types for both

pub mod cache_storage;
pub mod error;
pub mod reload;
