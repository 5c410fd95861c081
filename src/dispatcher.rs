//! Plain-message routing.
//!
//! Slash commands arm a dialog mode; the next plain message in that channel is
//! interpreted here according to the stored mode. Messages in channels without
//! a live mode are ignored. A consumed mode is cleared immediately; invalid
//! input keeps the mode alive so the user can retry until it expires.

use anyhow::Result;
use log::{debug, warn};
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handlers::remind::cancel_reply;
use crate::database::EntryKind;
use crate::features::dialog::DialogMode;
use crate::features::ledger;
use crate::features::reminders::scheduler::format_list;
use crate::features::reminders::TIME_FORMAT;

pub struct MessageDispatcher {
    ctx: Arc<CommandContext>,
}

impl MessageDispatcher {
    pub fn new(ctx: Arc<CommandContext>) -> Self {
        MessageDispatcher { ctx }
    }

    /// Interpret one plain message. Returns whether it was consumed by a
    /// dialog mode.
    pub async fn dispatch(&self, channel_id: u64, content: &str) -> Result<bool> {
        let Some(mode) = self.ctx.dialog_state.get(channel_id) else {
            return Ok(false);
        };
        debug!("channel {channel_id} message routed via {mode:?}");

        match mode {
            DialogMode::AwaitingCategoryChoice => {
                self.handle_category_choice(channel_id, content).await?
            }
            DialogMode::AwaitingReminderChoice => {
                self.handle_reminder_choice(channel_id, content).await?
            }
            DialogMode::Dialog(state) => match state.as_str() {
                "add_expense" => {
                    self.handle_entry_input(channel_id, content, EntryKind::Expense)
                        .await?
                }
                "add_income" => {
                    self.handle_entry_input(channel_id, content, EntryKind::Income)
                        .await?
                }
                "create_reminder" => self.handle_reminder_input(channel_id, content).await?,
                other => {
                    warn!("channel {channel_id} had unknown dialog state {other:?}");
                    self.ctx.dialog_state.clear(channel_id);
                    self.ctx
                        .messenger
                        .send(channel_id, "❌ Unknown state, please try again.")
                        .await;
                }
            },
        }
        Ok(true)
    }

    async fn handle_category_choice(&self, channel_id: u64, content: &str) -> Result<()> {
        let Ok(ordinal) = content.trim().parse::<usize>() else {
            // Keep the mode armed so the user can retry until it expires.
            self.ctx
                .messenger
                .send_with_ttl(
                    channel_id,
                    "⚠️ Enter a category number (for example: 1).",
                    self.ctx.ttls.notice,
                )
                .await;
            return Ok(());
        };

        self.ctx.dialog_state.clear(channel_id);
        let reply = ledger::delete_by_ordinal(&self.ctx.database, channel_id, ordinal).await?;
        self.ctx
            .messenger
            .send_with_ttl(channel_id, &reply, self.ctx.ttls.notice)
            .await;
        Ok(())
    }

    async fn handle_reminder_choice(&self, channel_id: u64, content: &str) -> Result<()> {
        let Ok(ordinal) = content.trim().parse::<usize>() else {
            self.ctx
                .messenger
                .send_with_ttl(
                    channel_id,
                    "⚠️ Enter a reminder number (for example: 1).",
                    self.ctx.ttls.notice,
                )
                .await;
            return Ok(());
        };

        self.ctx.dialog_state.clear(channel_id);
        let reply = cancel_reply(&self.ctx, channel_id, ordinal).await?;
        self.ctx.messenger.send(channel_id, &reply).await;
        Ok(())
    }

    async fn handle_entry_input(
        &self,
        channel_id: u64,
        content: &str,
        kind: EntryKind,
    ) -> Result<()> {
        match ledger::parse_entry_input(content) {
            Ok((category, amount)) => {
                self.ctx.dialog_state.clear(channel_id);
                let reply =
                    ledger::record_entry(&self.ctx.database, channel_id, &category, amount, kind)
                        .await?;
                self.ctx
                    .messenger
                    .send_with_ttl(channel_id, &reply, self.ctx.ttls.notice)
                    .await;
            }
            Err(hint) => {
                self.ctx
                    .messenger
                    .send_with_ttl(channel_id, hint, self.ctx.ttls.notice)
                    .await;
            }
        }
        Ok(())
    }

    async fn handle_reminder_input(&self, channel_id: u64, content: &str) -> Result<()> {
        let Some((time_str, text)) = content.trim().split_once(char::is_whitespace) else {
            self.ctx
                .messenger
                .send_with_ttl(
                    channel_id,
                    "⚠️ Wrong format. Example: 20:30 Log today's expenses",
                    self.ctx.ttls.notice,
                )
                .await;
            return Ok(());
        };

        let now = chrono::Local::now().time();
        let outcome = self
            .ctx
            .reminders
            .create(channel_id, time_str, text.trim(), now)
            .await?;
        let reply = match outcome {
            Ok(fire_time) => {
                self.ctx.dialog_state.clear(channel_id);
                let active = self.ctx.reminders.active(channel_id, now).await?;
                format!(
                    "✅ Reminder created!\n⏰ Time: {}\n📝 Text: {}\n\n{}",
                    fire_time.format(TIME_FORMAT),
                    text.trim(),
                    format_list(&active)
                )
            }
            // Rejections leave the mode armed for another attempt.
            Err(rejection) => rejection.to_string(),
        };
        self.ctx
            .messenger
            .send_with_ttl(channel_id, &reply, self.ctx.ttls.notice)
            .await;
        Ok(())
    }
}
