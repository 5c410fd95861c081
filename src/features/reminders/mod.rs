//! # Reminders Feature
//!
//! One-shot reminders fired at a wall-clock minute, delivered with a long
//! visibility TTL and removed so they fire at most once.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//! - **Toggleable**: true
//!
//! ## Changelog
//! - 1.1.0: Per-reminder failure isolation in the fire sweep
//! - 1.0.0: Initial release

pub mod scheduler;

pub use scheduler::{Rejection, ReminderScheduler, TIME_FORMAT};
