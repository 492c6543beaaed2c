//! Version layer: comparison and manifest fetching
//!
//! ```text
//! ┌──────────────┐   version   ┌──────────────┐
//! │   Manifest   │────────────▶│   Compare    │
//! │   (fetch)    │             │ (components) │
//! └──────────────┘             └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`compare`]: component-wise comparison of dot-separated versions
//! - [`source`]: trait for obtaining the version advertised by the server
//! - [`http`]: reqwest-based source reading a JSON manifest file
//! - [`error`]: error type for manifest fetching

pub mod compare;
pub mod error;
pub mod http;
pub mod source;
