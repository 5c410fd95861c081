//! Reminder scheduling semantics.
//!
//! Creation validates the requested time against the current wall-clock
//! time-of-day; the fire sweep runs once per minute and compares with both
//! sides truncated to the minute. There is no date component and no rollover:
//! a time earlier than "now" is refused rather than deferred to tomorrow.

use anyhow::Result;
use chrono::{NaiveTime, Timelike};
use log::{info, warn};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::core::task::TaskHandle;
use crate::database::{Database, ReminderRow};
use crate::messenger::Messenger;

/// Wall-clock format reminders are entered and stored in.
pub const TIME_FORMAT: &str = "%H:%M";

/// Why a reminder request was refused. These are user-facing values, not
/// errors - bad input never escapes as a panic or an `Err`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    BadTimeFormat,
    TimeInPast { now: NaiveTime, requested: NaiveTime },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::BadTimeFormat => {
                write!(f, "❌ Invalid time format. Use HH:MM (for example: 20:30)")
            }
            Rejection::TimeInPast { now, requested } => write!(
                f,
                "❌ Cannot set a reminder for a time already passed!\n⏰ Now: {}\n📅 You entered: {}",
                now.format(TIME_FORMAT),
                requested.format(TIME_FORMAT)
            ),
        }
    }
}

/// Scheduler for user reminders; rows live in the database, firing semantics
/// live here.
pub struct ReminderScheduler {
    database: Database,
    messenger: Messenger,
    /// How long a delivered reminder stays visible before auto-deletion.
    visibility_ttl: i64,
}

impl ReminderScheduler {
    pub fn new(database: Database, messenger: Messenger, visibility_ttl: i64) -> Arc<Self> {
        Arc::new(ReminderScheduler {
            database,
            messenger,
            visibility_ttl,
        })
    }

    /// Create a reminder at `time_str` ("HH:MM") for the channel.
    ///
    /// Returns the parsed time on success, or the user-facing rejection.
    /// Rejected requests leave the store untouched.
    pub async fn create(
        &self,
        channel_id: u64,
        time_str: &str,
        text: &str,
        now: NaiveTime,
    ) -> Result<Result<NaiveTime, Rejection>> {
        let Ok(requested) = NaiveTime::parse_from_str(time_str.trim(), TIME_FORMAT) else {
            return Ok(Err(Rejection::BadTimeFormat));
        };
        if requested < now {
            return Ok(Err(Rejection::TimeInPast { now, requested }));
        }

        let fire_time = requested.format(TIME_FORMAT).to_string();
        let id = self
            .database
            .add_reminder(channel_id, &fire_time, text)
            .await?;
        info!("created reminder {id} for channel {channel_id} at {fire_time}");
        Ok(Ok(requested))
    }

    /// The channel's not-yet-due reminders, ascending by fire time.
    pub async fn active(&self, channel_id: u64, now: NaiveTime) -> Result<Vec<ReminderRow>> {
        let from = truncate_to_minute(now).format(TIME_FORMAT).to_string();
        self.database.active_reminders(channel_id, &from).await
    }

    /// Cancel by 1-based position in the active list sorted ascending by fire
    /// time - the same ordering the user was shown. Returns the removed row,
    /// or `None` when the ordinal is out of range.
    pub async fn cancel_by_index(
        &self,
        channel_id: u64,
        ordinal: usize,
        now: NaiveTime,
    ) -> Result<Option<ReminderRow>> {
        let active = self.active(channel_id, now).await?;
        if ordinal < 1 || ordinal > active.len() {
            return Ok(None);
        }
        let victim = active[ordinal - 1].clone();
        self.database.delete_reminder(victim.id).await?;
        info!(
            "cancelled reminder {} ({}) for channel {}",
            victim.id, victim.fire_time, channel_id
        );
        Ok(Some(victim))
    }

    /// Fire every reminder matching the current minute and delete it.
    ///
    /// Delivery goes through the messenger with the long visibility TTL; a
    /// failed send is logged by the messenger and the reminder is still
    /// consumed, so one unreachable channel cannot block or re-fire others.
    pub async fn fire_due(&self, now: NaiveTime) -> Result<usize> {
        let minute = truncate_to_minute(now).format(TIME_FORMAT).to_string();
        let due = self.database.reminders_due_at(&minute).await?;
        let count = due.len();

        for reminder in due {
            let text = format!(
                "🔔 Reminder ({}):\n{}",
                reminder.fire_time, reminder.message
            );
            self.messenger
                .send_with_ttl(reminder.channel_id, &text, self.visibility_ttl)
                .await;
            if let Err(e) = self.database.delete_reminder(reminder.id).await {
                warn!("failed to remove fired reminder {}: {e}", reminder.id);
            }
        }
        Ok(count)
    }

    /// Start the once-per-minute fire sweep.
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> TaskHandle {
        let scheduler = self;
        let (tx, mut rx) = TaskHandle::stop_channel();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let now = chrono::Local::now().time();
                        if let Err(e) = scheduler.fire_due(now).await {
                            warn!("reminder sweep failed: {e}");
                        }
                    }
                    _ = rx.changed() => break,
                }
            }
        });
        info!("reminder fire sweep started (interval: {interval:?})");
        TaskHandle::new("reminder sweep", tx, handle)
    }
}

/// Drop seconds and sub-seconds; both sides of the fire comparison use this.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Numbered reminder list shown by `/reminders` and the cancel dialog.
pub fn format_list(rows: &[ReminderRow]) -> String {
    if rows.is_empty() {
        return "📋 You have no active reminders\n\n💡 Use /notify to create one.".to_string();
    }
    let mut list = String::from("📋 Your active reminders:\n\n");
    for (i, row) in rows.iter().enumerate() {
        list.push_str(&format!("{}. ⏰ {} - {}\n", i + 1, row.fire_time, row.message));
    }
    list.push_str(&format!("\n💡 Total active reminders: {}", rows.len()));
    list
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::testing::{RecordingSink, SinkCall};
    use crate::features::ephemeral::DeletionScheduler;

    const CHANNEL: u64 = 12;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    async fn scheduler() -> (Arc<ReminderScheduler>, Arc<RecordingSink>, Arc<DeletionScheduler>) {
        let db = Database::in_memory().await.unwrap();
        let sink = RecordingSink::new();
        let deletion = DeletionScheduler::new(sink.clone());
        let messenger = Messenger::new(sink.clone(), deletion.clone());
        (
            ReminderScheduler::new(db, messenger, 36_000),
            sink,
            deletion,
        )
    }

    #[test]
    fn test_truncate_to_minute() {
        assert_eq!(truncate_to_minute(t(9, 0, 59)), t(9, 0, 0));
        assert_eq!(truncate_to_minute(t(23, 59, 1)), t(23, 59, 0));
    }

    #[tokio::test]
    async fn test_create_rejects_bad_format() {
        let (scheduler, _, _) = scheduler().await;

        let outcome = scheduler
            .create(CHANNEL, "25:99", "x", t(8, 0, 0))
            .await
            .unwrap();
        assert_eq!(outcome, Err(Rejection::BadTimeFormat));

        let outcome = scheduler
            .create(CHANNEL, "soonish", "x", t(8, 0, 0))
            .await
            .unwrap();
        assert_eq!(outcome, Err(Rejection::BadTimeFormat));
        assert!(scheduler.active(CHANNEL, t(0, 0, 0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_past_time_without_mutation() {
        let (scheduler, _, _) = scheduler().await;

        let outcome = scheduler
            .create(CHANNEL, "09:30", "x", t(10, 0, 0))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            Err(Rejection::TimeInPast {
                now: t(10, 0, 0),
                requested: t(9, 30, 0)
            })
        );
        assert!(scheduler.active(CHANNEL, t(0, 0, 0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fire_at_matching_minute_exactly_once() {
        let (scheduler, sink, _) = scheduler().await;

        // Created at 08:59 for 09:00.
        scheduler
            .create(CHANNEL, "09:00", "stand up", t(8, 59, 0))
            .await
            .unwrap()
            .unwrap();

        // 08:59 tick: nothing due.
        assert_eq!(scheduler.fire_due(t(8, 59, 30)).await.unwrap(), 0);

        // 09:00 tick (with seconds - truncation must hide them): fires.
        assert_eq!(scheduler.fire_due(t(9, 0, 42)).await.unwrap(), 1);
        let sends: Vec<_> = sink
            .calls()
            .into_iter()
            .filter(|c| matches!(c, SinkCall::Send { .. }))
            .collect();
        assert_eq!(sends.len(), 1);

        // Gone from the store; a second 09:00 tick is silent.
        assert!(scheduler.active(CHANNEL, t(0, 0, 0)).await.unwrap().is_empty());
        assert_eq!(scheduler.fire_due(t(9, 0, 55)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_fired_reminder_gets_visibility_ttl() {
        let (scheduler, _, deletion) = scheduler().await;

        scheduler
            .create(CHANNEL, "09:00", "stand up", t(8, 0, 0))
            .await
            .unwrap()
            .unwrap();
        scheduler.fire_due(t(9, 0, 0)).await.unwrap();

        assert_eq!(deletion.len(), 1, "delivered reminder queued for deletion");
    }

    #[tokio::test]
    async fn test_same_minute_fires_for_all_channels_despite_failures() {
        let (scheduler, sink, _) = scheduler().await;

        scheduler
            .create(10, "09:00", "a", t(8, 0, 0))
            .await
            .unwrap()
            .unwrap();
        scheduler
            .create(20, "09:00", "b", t(8, 0, 0))
            .await
            .unwrap()
            .unwrap();

        // Sends fail silently inside the messenger; both reminders are
        // still consumed.
        sink.fail_sends
            .store(true, std::sync::atomic::Ordering::SeqCst);
        assert_eq!(scheduler.fire_due(t(9, 0, 0)).await.unwrap(), 2);
        assert!(scheduler.active(10, t(0, 0, 0)).await.unwrap().is_empty());
        assert!(scheduler.active(20, t(0, 0, 0)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancel_by_index_uses_sorted_order() {
        let (scheduler, _, _) = scheduler().await;

        // Insert out of order; the list the user sees is time-sorted.
        scheduler
            .create(CHANNEL, "09:05", "second", t(8, 0, 0))
            .await
            .unwrap()
            .unwrap();
        scheduler
            .create(CHANNEL, "09:00", "first", t(8, 0, 0))
            .await
            .unwrap()
            .unwrap();

        let removed = scheduler
            .cancel_by_index(CHANNEL, 1, t(8, 0, 0))
            .await
            .unwrap()
            .expect("ordinal 1 exists");
        assert_eq!(removed.fire_time, "09:00");

        // The remaining reminder is addressable as ordinal 1 now.
        let active = scheduler.active(CHANNEL, t(8, 0, 0)).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].fire_time, "09:05");
    }

    #[tokio::test]
    async fn test_cancel_by_index_out_of_range_is_not_a_crash() {
        let (scheduler, _, _) = scheduler().await;
        scheduler
            .create(CHANNEL, "09:00", "only", t(8, 0, 0))
            .await
            .unwrap()
            .unwrap();

        assert!(scheduler
            .cancel_by_index(CHANNEL, 0, t(8, 0, 0))
            .await
            .unwrap()
            .is_none());
        assert!(scheduler
            .cancel_by_index(CHANNEL, 2, t(8, 0, 0))
            .await
            .unwrap()
            .is_none());
        assert_eq!(scheduler.active(CHANNEL, t(8, 0, 0)).await.unwrap().len(), 1);
    }
}
