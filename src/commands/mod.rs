//! # Command System
//!
//! Slash command (/) handling for Discord interactions.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false
//!
//! ## Changelog
//! - 1.1.0: Transient interaction responses registered with the deletion queue
//! - 1.0.0: Initial release with handler trait, context, and registry

pub mod context;
pub mod handler;
pub mod handlers;
pub mod registry;
pub mod slash;

pub use context::CommandContext;
pub use handler::SlashCommandHandler;
pub use registry::CommandRegistry;

pub use slash::{
    create_slash_commands, get_integer_option, get_number_option, get_string_option,
    register_global_commands, register_guild_commands,
};

use std::sync::Arc;

/// Build the registry with every built-in handler.
pub fn default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(Arc::new(handlers::ledger::LedgerHandler));
    registry.register(Arc::new(handlers::report::ReportHandler));
    registry.register(Arc::new(handlers::remind::RemindHandler));
    registry.register(Arc::new(handlers::rates::RatesHandler));
    registry.register(Arc::new(handlers::fact::FactHandler));
    registry
}
