//! Stale-build detection for deployed clients.
//!
//! A client embeds its own version string. On activation the
//! [`check::StalenessController`] fetches the version advertised by a
//! manifest file on the server, compares the two with
//! [`version::compare::greater_than`], and when the client is behind it
//! clears every cache bucket and requests a full reload.
//!
//! # Modules
//!
//! - [`check`]: the staleness state machine and its error type
//! - [`config`]: caller options, constants and data paths
//! - [`overlay`]: the status overlay shown while idle, checking or failed
//! - [`platform`]: cache-bucket storage and reload seams
//! - [`storage`]: key/value stores holding the refresh marker
//! - [`version`]: version comparison and manifest fetching

pub mod check;
pub mod config;
pub mod overlay;
pub mod platform;
pub mod storage;
pub mod version;

#[cfg(test)]
mod test_support;
