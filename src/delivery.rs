//! Outbound delivery seam.
//!
//! The schedulers never talk to Discord directly; they go through
//! [`MessageSink`] so tests can swap in a recording fake. [`DiscordSink`] is
//! the production implementation on top of serenity's HTTP client.

use anyhow::Result;
use async_trait::async_trait;
use serenity::http::Http;
use serenity::model::id::ChannelId;
use std::sync::Arc;

/// Outbound channel used by the schedulers for their side effects.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Send `text` to a channel, returning the new message's id.
    async fn send(&self, channel_id: u64, text: &str) -> Result<u64>;

    /// Delete a previously sent message.
    async fn delete(&self, channel_id: u64, message_id: u64) -> Result<()>;
}

/// Production sink backed by the Discord REST API.
pub struct DiscordSink {
    http: Arc<Http>,
}

impl DiscordSink {
    pub fn new(http: Arc<Http>) -> Self {
        DiscordSink { http }
    }
}

#[async_trait]
impl MessageSink for DiscordSink {
    async fn send(&self, channel_id: u64, text: &str) -> Result<u64> {
        let message = ChannelId(channel_id).say(&self.http, text).await?;
        Ok(message.id.0)
    }

    async fn delete(&self, channel_id: u64, message_id: u64) -> Result<()> {
        self.http.delete_message(channel_id, message_id).await?;
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    //! Recording sink shared by the scheduler tests.

    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum SinkCall {
        Send { channel_id: u64, text: String },
        Delete { channel_id: u64, message_id: u64 },
    }

    /// Sink that records every call and hands out sequential message ids.
    #[derive(Default)]
    pub struct RecordingSink {
        pub calls: Mutex<Vec<SinkCall>>,
        next_id: AtomicU64,
        pub fail_sends: std::sync::atomic::AtomicBool,
        pub fail_deletes: std::sync::atomic::AtomicBool,
    }

    impl RecordingSink {
        pub fn new() -> Arc<Self> {
            Arc::new(RecordingSink::default())
        }

        pub fn calls(&self) -> Vec<SinkCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn deletes(&self) -> Vec<(u64, u64)> {
            self.calls()
                .into_iter()
                .filter_map(|c| match c {
                    SinkCall::Delete {
                        channel_id,
                        message_id,
                    } => Some((channel_id, message_id)),
                    _ => None,
                })
                .collect()
        }
    }

    #[async_trait]
    impl MessageSink for RecordingSink {
        async fn send(&self, channel_id: u64, text: &str) -> Result<u64> {
            if self.fail_sends.load(Ordering::SeqCst) {
                anyhow::bail!("sink unreachable");
            }
            self.calls.lock().unwrap().push(SinkCall::Send {
                channel_id,
                text: text.to_string(),
            });
            Ok(self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
        }

        async fn delete(&self, channel_id: u64, message_id: u64) -> Result<()> {
            if self.fail_deletes.load(Ordering::SeqCst) {
                anyhow::bail!("sink unreachable");
            }
            self.calls.lock().unwrap().push(SinkCall::Delete {
                channel_id,
                message_id,
            });
            Ok(())
        }
    }
}
