//! Deferred message deletion.
//!
//! Transient messages are queued with a TTL and removed by a drain worker once
//! due. The queue is FIFO and the worker stops at the first not-yet-due entry
//! instead of scanning the whole queue. Insertion order is therefore
//! load-bearing: it is a safe proxy for fire-time order only because every
//! call site enqueues one of the fixed TTL constants from `core::config::Ttls`
//! consistently. Mixing TTLs out of fire-time order would park later-due
//! entries behind an earlier-due one until it fires (covered in tests below).

use dashmap::DashMap;
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::core::task::TaskHandle;
use crate::delivery::MessageSink;

#[derive(Clone, Debug)]
struct PendingDeletion {
    channel_id: u64,
    message_id: u64,
    fire_at: Instant,
}

/// Queue of messages awaiting deletion, drained by a background worker.
pub struct DeletionScheduler {
    sink: Arc<dyn MessageSink>,
    queue: Mutex<VecDeque<PendingDeletion>>,
    /// Guard upholding the at-most-once invariant per message id.
    queued: DashMap<(u64, u64), ()>,
}

impl DeletionScheduler {
    pub fn new(sink: Arc<dyn MessageSink>) -> Arc<Self> {
        Arc::new(DeletionScheduler {
            sink,
            queue: Mutex::new(VecDeque::new()),
            queued: DashMap::new(),
        })
    }

    /// Queue a message for deletion after `ttl_seconds`.
    ///
    /// No-op for non-positive TTLs and for messages already queued.
    pub fn schedule(&self, channel_id: u64, message_id: u64, ttl_seconds: i64) {
        if ttl_seconds <= 0 {
            return;
        }
        if self.queued.insert((channel_id, message_id), ()).is_some() {
            debug!("message {message_id} in channel {channel_id} already queued for deletion");
            return;
        }
        let entry = PendingDeletion {
            channel_id,
            message_id,
            fire_at: Instant::now() + Duration::from_secs(ttl_seconds as u64),
        };
        self.queue.lock().unwrap().push_back(entry);
    }

    /// Delete a message right away, bypassing the queue.
    ///
    /// Sink failures are logged and swallowed; deletions are fire-and-forget.
    pub async fn delete_now(&self, channel_id: u64, message_id: u64) {
        if let Err(e) = self.sink.delete(channel_id, message_id).await {
            warn!("failed to delete message {message_id} in channel {channel_id}: {e}");
        }
    }

    /// Number of queued deletions.
    pub fn len(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pop every entry due at `now`, front first, stopping at the first entry
    /// still in the future.
    fn pop_due(&self, now: Instant) -> Vec<PendingDeletion> {
        let mut due = Vec::new();
        let mut queue = self.queue.lock().unwrap();
        while queue.front().is_some_and(|front| front.fire_at <= now) {
            if let Some(entry) = queue.pop_front() {
                self.queued.remove(&(entry.channel_id, entry.message_id));
                due.push(entry);
            }
        }
        due
    }

    /// One drain pass: collect due entries, then delete each via the sink.
    ///
    /// A failing delete never aborts the rest of the batch.
    pub async fn drain_tick(&self, now: Instant) -> usize {
        let due = self.pop_due(now);
        let count = due.len();
        for entry in due {
            self.delete_now(entry.channel_id, entry.message_id).await;
        }
        if count > 0 {
            debug!("deletion drain removed {count} message(s)");
        }
        count
    }

    /// Start the periodic drain worker.
    pub fn spawn_worker(self: Arc<Self>, interval: Duration) -> TaskHandle {
        let scheduler = self;
        let (tx, mut rx) = TaskHandle::stop_channel();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        scheduler.drain_tick(Instant::now()).await;
                    }
                    _ = rx.changed() => break,
                }
            }
        });
        info!("message-deletion drain worker started (interval: {interval:?})");
        TaskHandle::new("deletion drain", tx, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::testing::RecordingSink;

    const CHANNEL: u64 = 77;

    #[tokio::test]
    async fn test_non_positive_ttl_never_enqueues() {
        let sink = RecordingSink::new();
        let scheduler = DeletionScheduler::new(sink.clone());

        scheduler.schedule(CHANNEL, 1, 0);
        scheduler.schedule(CHANNEL, 2, -5);

        assert!(scheduler.is_empty());
        let far_future = Instant::now() + Duration::from_secs(3600);
        assert_eq!(scheduler.drain_tick(far_future).await, 0);
        assert!(sink.deletes().is_empty());
    }

    #[tokio::test]
    async fn test_message_queued_at_most_once() {
        let sink = RecordingSink::new();
        let scheduler = DeletionScheduler::new(sink);

        scheduler.schedule(CHANNEL, 1, 60);
        scheduler.schedule(CHANNEL, 1, 60);

        assert_eq!(scheduler.len(), 1);
    }

    #[tokio::test]
    async fn test_drain_deletes_in_enqueue_order_for_identical_ttl() {
        let sink = RecordingSink::new();
        let scheduler = DeletionScheduler::new(sink.clone());

        for id in 1..=4u64 {
            scheduler.schedule(CHANNEL, id, 60);
        }

        let after_due = Instant::now() + Duration::from_secs(120);
        assert_eq!(scheduler.drain_tick(after_due).await, 4);
        assert_eq!(
            sink.deletes(),
            vec![(CHANNEL, 1), (CHANNEL, 2), (CHANNEL, 3), (CHANNEL, 4)]
        );
        assert!(scheduler.is_empty());
    }

    #[tokio::test]
    async fn test_drain_stops_at_first_not_due_entry() {
        let sink = RecordingSink::new();
        let scheduler = DeletionScheduler::new(sink.clone());

        scheduler.schedule(CHANNEL, 1, 10);
        scheduler.schedule(CHANNEL, 2, 3600);
        scheduler.schedule(CHANNEL, 3, 10);

        // Entry 3 is due at +10s like entry 1, but sits behind the
        // hour-long entry 2: the early-stop scan will not reach it. This is
        // the documented FIFO approximation - uniform TTLs keep it correct.
        let now = Instant::now() + Duration::from_secs(60);
        assert_eq!(scheduler.drain_tick(now).await, 1);
        assert_eq!(sink.deletes(), vec![(CHANNEL, 1)]);
        assert_eq!(scheduler.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_delete_does_not_abort_batch() {
        let sink = RecordingSink::new();
        let scheduler = DeletionScheduler::new(sink.clone());

        scheduler.schedule(CHANNEL, 1, 10);
        scheduler.schedule(CHANNEL, 2, 10);
        sink.fail_deletes
            .store(true, std::sync::atomic::Ordering::SeqCst);

        let now = Instant::now() + Duration::from_secs(60);
        // Both entries are consumed even though every delete fails.
        assert_eq!(scheduler.drain_tick(now).await, 2);
        assert!(scheduler.is_empty());
        assert!(sink.deletes().is_empty());
    }

    #[tokio::test]
    async fn test_delete_now_bypasses_queue() {
        let sink = RecordingSink::new();
        let scheduler = DeletionScheduler::new(sink.clone());

        scheduler.schedule(CHANNEL, 9, 3600);
        scheduler.delete_now(CHANNEL, 42).await;

        assert_eq!(sink.deletes(), vec![(CHANNEL, 42)]);
        assert_eq!(scheduler.len(), 1, "queued entry stays queued");
    }

    #[tokio::test]
    async fn test_concurrent_schedules_lose_nothing() {
        let sink = RecordingSink::new();
        let scheduler = DeletionScheduler::new(sink);

        let mut tasks = Vec::new();
        for id in 0..100u64 {
            let scheduler = Arc::clone(&scheduler);
            tasks.push(tokio::spawn(async move {
                scheduler.schedule(id, id + 1000, 60);
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(scheduler.len(), 100);
    }

    #[tokio::test]
    async fn test_worker_drains_due_entries() {
        let sink = RecordingSink::new();
        let scheduler = DeletionScheduler::new(sink.clone());

        scheduler.schedule(CHANNEL, 5, 1);
        let worker = Arc::clone(&scheduler).spawn_worker(Duration::from_millis(20));

        tokio::time::sleep(Duration::from_millis(1200)).await;
        worker.shutdown().await;

        assert_eq!(sink.deletes(), vec![(CHANNEL, 5)]);
    }
}
