//! # Ephemeral Messages Feature
//!
//! Bounded lifetimes for transient bot messages: every notice, prompt, and
//! fired reminder is deleted again once its TTL passes.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod deletion;

pub use deletion::DeletionScheduler;
