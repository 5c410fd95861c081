//! Feature modules.
//!
//! Each feature is self-contained under its own directory and re-exported
//! here for convenient access.

pub mod backup;
pub mod dialog;
pub mod ephemeral;
pub mod facts;
pub mod ledger;
pub mod rates;
pub mod reminders;
pub mod reports;

pub use backup::BackupTask;
pub use dialog::{DialogMode, DialogStateStore};
pub use ephemeral::DeletionScheduler;
pub use facts::FactsClient;
pub use rates::RatesClient;
pub use reminders::ReminderScheduler;
pub use reports::ReportPeriod;
