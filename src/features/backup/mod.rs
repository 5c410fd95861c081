//! # Database Backup Feature
//!
//! Hourly copy of the sqlite file posted to an admin channel. Disabled when no
//! backup channel is configured.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0
//! - **Toggleable**: true

use anyhow::{Context as _, Result};
use log::{info, warn};
use serenity::http::Http;
use serenity::model::channel::AttachmentType;
use serenity::model::id::ChannelId;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::core::task::TaskHandle;

pub struct BackupTask {
    http: Arc<Http>,
    database_path: String,
    channel_id: u64,
}

impl BackupTask {
    pub fn new(http: Arc<Http>, database_path: String, channel_id: u64) -> Arc<Self> {
        Arc::new(BackupTask {
            http,
            database_path,
            channel_id,
        })
    }

    /// Copy the database file and upload the copy.
    pub async fn run_once(&self) -> Result<()> {
        if !Path::new(&self.database_path).exists() {
            return Ok(());
        }
        let backup_path = format!("{}.backup", self.database_path);
        tokio::fs::copy(&self.database_path, &backup_path)
            .await
            .context("failed to copy database file")?;

        ChannelId(self.channel_id)
            .send_files(
                &self.http,
                [AttachmentType::Path(Path::new(&backup_path))],
                |m| m.content("🤖 Automatic database backup"),
            )
            .await
            .context("failed to upload backup")?;
        Ok(())
    }

    /// Start the periodic backup loop.
    pub fn spawn(self: Arc<Self>, interval: Duration) -> TaskHandle {
        let task = self;
        let (tx, mut rx) = TaskHandle::stop_channel();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick fires immediately; skip it so startup does not
            // spam the admin channel on every restart.
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if let Err(e) = task.run_once().await {
                            warn!("database backup failed: {e}");
                        }
                    }
                    _ = rx.changed() => break,
                }
            }
        });
        info!("database backup task started (interval: {interval:?})");
        TaskHandle::new("database backup", tx, handle)
    }
}
