//! # Dialog State Feature
//!
//! Per-channel "what am I waiting for next" input modes with automatic expiry.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Expiry sweep moved to a shared TaskHandle with bounded shutdown
//! - 1.0.0: Initial release with DashMap-backed store

pub mod store;

pub use store::{DialogMode, DialogStateStore};
