//! Staleness check
//!
//! # Modules
//!
//! - [`controller`]: runs one check per activation and owns its side effects
//! - [`state`]: observable state of the check and activation results
//! - [`error`]: reasons a check ends in the error state

pub mod controller;
pub mod error;
pub mod state;

pub use controller::StalenessController;
pub use error::CheckError;
pub use state::{Activation, CheckState};
