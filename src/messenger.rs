//! Outbound messages with optional auto-deletion.
//!
//! Thin layer over the delivery sink: send a message, and when a TTL is given
//! register it with the deletion scheduler so it disappears again. Send
//! failures are logged and swallowed - a lost notice must never bubble into a
//! scheduler sweep or a command handler.

use log::warn;
use std::sync::Arc;

use crate::delivery::MessageSink;
use crate::features::ephemeral::DeletionScheduler;

#[derive(Clone)]
pub struct Messenger {
    sink: Arc<dyn MessageSink>,
    deletion: Arc<DeletionScheduler>,
}

impl Messenger {
    pub fn new(sink: Arc<dyn MessageSink>, deletion: Arc<DeletionScheduler>) -> Self {
        Messenger { sink, deletion }
    }

    /// Send a permanent message.
    pub async fn send(&self, channel_id: u64, text: &str) -> Option<u64> {
        self.send_with_ttl(channel_id, text, 0).await
    }

    /// Send a message and, for positive TTLs, schedule its deletion.
    ///
    /// Returns the message id when the send succeeded.
    pub async fn send_with_ttl(&self, channel_id: u64, text: &str, ttl_seconds: i64) -> Option<u64> {
        match self.sink.send(channel_id, text).await {
            Ok(message_id) => {
                if ttl_seconds > 0 {
                    self.deletion.schedule(channel_id, message_id, ttl_seconds);
                }
                Some(message_id)
            }
            Err(e) => {
                warn!("failed to send message to channel {channel_id}: {e}");
                None
            }
        }
    }

}
