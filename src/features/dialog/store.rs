//! Conversation input-mode store.
//!
//! When the bot asks a follow-up question ("enter category and amount", "reply
//! with the number to delete") it records what the next plain message in that
//! channel means. Entries expire so an abandoned dialog cannot permanently
//! hijack a channel's messages: the TTL bounds the window during which
//! unrelated input would be misread as dialog input.

use dashmap::DashMap;
use log::{debug, info};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::core::task::TaskHandle;

/// What the next plain-text message in a channel will be interpreted as.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogMode {
    /// A numbered category list was shown; expecting an ordinal to delete.
    AwaitingCategoryChoice,
    /// A numbered reminder list was shown; expecting an ordinal to cancel.
    AwaitingReminderChoice,
    /// Free-form dialog step, keyed by name (e.g. "add_expense").
    Dialog(String),
}

#[derive(Clone, Debug)]
struct ModeEntry {
    mode: DialogMode,
    expires_at: Instant,
}

/// Channel-keyed store of live input modes.
///
/// At most one mode per channel; `set` overwrites and restarts the expiry
/// clock. Reads return snapshots; `get` does not itself evaluate expiry, so a
/// just-expired mode may be visible for up to one sweep interval. That
/// staleness is accepted: the sweep owns expiry.
pub struct DialogStateStore {
    entries: DashMap<u64, ModeEntry>,
    default_ttl: Duration,
}

impl DialogStateStore {
    pub fn new(default_ttl: Duration) -> Arc<Self> {
        Arc::new(DialogStateStore {
            entries: DashMap::new(),
            default_ttl,
        })
    }

    /// Set the channel's mode with the default TTL, replacing any prior mode.
    pub fn set(&self, channel_id: u64, mode: DialogMode) {
        self.set_with_ttl(channel_id, mode, self.default_ttl);
    }

    /// Set the channel's mode with an explicit TTL.
    pub fn set_with_ttl(&self, channel_id: u64, mode: DialogMode, ttl: Duration) {
        let entry = ModeEntry {
            mode,
            expires_at: Instant::now() + ttl,
        };
        self.entries.insert(channel_id, entry);
    }

    /// Snapshot of the channel's current mode, if any.
    pub fn get(&self, channel_id: u64) -> Option<DialogMode> {
        self.entries.get(&channel_id).map(|e| e.mode.clone())
    }

    /// Whether the channel has a live mode.
    pub fn has(&self, channel_id: u64) -> bool {
        self.entries.contains_key(&channel_id)
    }

    /// Remove the channel's mode. No-op when absent.
    pub fn clear(&self, channel_id: u64) {
        self.entries.remove(&channel_id);
    }

    /// Drop every entry whose expiry has passed. Returns the removal count.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!("dialog sweep removed {removed} expired mode(s)");
        }
        removed
    }

    /// Start the periodic expiry sweep.
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> TaskHandle {
        let store = self;
        let (tx, mut rx) = TaskHandle::stop_channel();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        store.sweep_expired();
                    }
                    _ = rx.changed() => break,
                }
            }
        });
        info!("dialog-state expiry sweep started (interval: {interval:?})");
        TaskHandle::new("dialog-state sweep", tx, handle)
    }
}
