//! Handle for long-lived background tasks with bounded shutdown.
//!
//! All three sweeps (dialog-state expiry, message-deletion drain, reminder
//! fire) run as plain tokio tasks on a fixed cadence. A `TaskHandle` stops one
//! promptly: signal, wait up to the grace period for the current tick to
//! finish, then abort.

use log::{info, warn};
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

/// How long `shutdown` waits for an in-flight tick before aborting the task.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// A stoppable background task.
pub struct TaskHandle {
    name: &'static str,
    stop: watch::Sender<bool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TaskHandle {
    /// Wrap a spawned task together with its stop signal.
    ///
    /// The task is expected to `select!` on the receiver side of `stop` and
    /// exit its loop once the value flips to `true`.
    pub fn new(name: &'static str, stop: watch::Sender<bool>, handle: JoinHandle<()>) -> Self {
        TaskHandle {
            name,
            stop,
            handle: Mutex::new(Some(handle)),
        }
    }

    /// Create the stop channel a task loop should listen on.
    pub fn stop_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
        watch::channel(false)
    }

    /// Stop the task: signal, join with a grace period, abort as fallback.
    ///
    /// Idempotent; a second call is a no-op.
    pub async fn shutdown(&self) {
        let handle = self.handle.lock().await.take();
        let Some(handle) = handle else {
            return;
        };

        let _ = self.stop.send(true);
        let abort = handle.abort_handle();
        match tokio::time::timeout(SHUTDOWN_GRACE, handle).await {
            Ok(_) => info!("{} task stopped", self.name),
            Err(_) => {
                warn!(
                    "{} task did not stop within {:?}, aborting",
                    self.name, SHUTDOWN_GRACE
                );
                abort.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shutdown_stops_loop() {
        let (tx, mut rx) = TaskHandle::stop_channel();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(10));
            loop {
                tokio::select! {
                    _ = interval.tick() => {}
                    _ = rx.changed() => break,
                }
            }
        });

        let task = TaskHandle::new("test", tx, handle);
        task.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_is_idempotent() {
        let (tx, mut rx) = TaskHandle::stop_channel();
        let handle = tokio::spawn(async move {
            let _ = rx.changed().await;
        });

        let task = TaskHandle::new("test", tx, handle);
        task.shutdown().await;
        task.shutdown().await;
    }
}
