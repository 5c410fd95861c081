// Core layer - configuration and shared infrastructure
pub mod core;

// Features layer - all feature modules
pub mod features;

// Infrastructure
pub mod database;
pub mod delivery;
pub mod messenger;

// Application layer
pub mod commands;
pub mod dispatcher;

// Re-export core config for convenience
pub use core::Config;

// Re-export feature items for convenience
pub use features::{
    // Backup
    BackupTask,
    // Deferred deletion
    DeletionScheduler,
    // Dialog state
    DialogMode, DialogStateStore,
    // Facts
    FactsClient,
    // Rates
    RatesClient,
    // Reminders
    ReminderScheduler,
};

pub use database::Database;
pub use delivery::{DiscordSink, MessageSink};
pub use dispatcher::MessageDispatcher;
pub use messenger::Messenger;
