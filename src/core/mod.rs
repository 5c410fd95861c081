//! # Core Module
//!
//! Configuration and shared infrastructure for the tally bot.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Add task module with bounded background-task shutdown
//! - 1.0.0: Initial creation with config module

pub mod config;
pub mod task;

// Re-export commonly used items
pub use config::{Config, Ttls};
pub use task::TaskHandle;
