//! Reminder command handlers
//!
//! Handles: notify, reminders
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::{get_integer_option, get_string_option};
use crate::features::dialog::DialogMode;
use crate::features::reminders::scheduler::format_list;

/// Handler for reminder-related commands
pub struct RemindHandler;

#[async_trait]
impl SlashCommandHandler for RemindHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["notify", "reminders"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match command.data.name.as_str() {
            "notify" => self.handle_notify(&ctx, serenity_ctx, command).await,
            "reminders" => self.handle_reminders(&ctx, serenity_ctx, command).await,
            _ => Ok(()),
        }
    }
}

impl RemindHandler {
    /// `/notify`: create a reminder from options, or arm the dialog flow.
    async fn handle_notify(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let channel_id = command.channel_id.0;
        let time = get_string_option(&command.data.options, "time");
        let message = get_string_option(&command.data.options, "message");

        let (Some(time), Some(message)) = (time, message) else {
            ctx.dialog_state
                .set(channel_id, DialogMode::Dialog("create_reminder".to_string()));
            debug!("channel {channel_id} entered dialog mode create_reminder");
            return ctx
                .respond_transient(
                    serenity_ctx,
                    command,
                    "🕓 Enter the time and reminder text\n💡 Example: 20:30 Log today's expenses",
                    ctx.ttls.notice,
                )
                .await;
        };

        let now = chrono::Local::now().time();
        let reply = match ctx.reminders.create(channel_id, &time, &message, now).await? {
            Ok(fire_time) => {
                let active = ctx.reminders.active(channel_id, now).await?;
                format!(
                    "✅ Reminder created!\n⏰ Time: {}\n📝 Text: {message}\n\n{}",
                    fire_time.format(crate::features::reminders::TIME_FORMAT),
                    format_list(&active)
                )
            }
            Err(rejection) => rejection.to_string(),
        };
        ctx.respond_transient(serenity_ctx, command, &reply, ctx.ttls.notice)
            .await
    }

    /// `/reminders`: list, or remove by number (directly or via dialog).
    async fn handle_reminders(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let channel_id = command.channel_id.0;
        let action =
            get_string_option(&command.data.options, "action").unwrap_or_else(|| "list".into());
        let now = chrono::Local::now().time();

        if action == "remove" {
            if let Some(number) = get_integer_option(&command.data.options, "number") {
                let reply = cancel_reply(ctx, channel_id, number.max(0) as usize).await?;
                return ctx
                    .respond_transient(serenity_ctx, command, &reply, ctx.ttls.notice)
                    .await;
            }

            let active = ctx.reminders.active(channel_id, now).await?;
            if active.is_empty() {
                return ctx
                    .respond_transient(
                        serenity_ctx,
                        command,
                        "📋 You have no reminders to remove",
                        ctx.ttls.notice,
                    )
                    .await;
            }
            ctx.dialog_state
                .set(channel_id, DialogMode::AwaitingReminderChoice);
            let prompt = format!(
                "🗑️ Choose a reminder to remove:\n\n{}\n\n💡 Reply with the reminder number",
                format_list(&active)
            );
            return ctx
                .respond_transient(serenity_ctx, command, &prompt, ctx.ttls.notice)
                .await;
        }

        let active = ctx.reminders.active(channel_id, now).await?;
        ctx.respond_transient(serenity_ctx, command, &format_list(&active), ctx.ttls.notice)
            .await
    }
}

/// Ordinal-based cancel shared by the `/reminders remove` option path and the
/// numbered-choice dialog.
pub(crate) async fn cancel_reply(
    ctx: &CommandContext,
    channel_id: u64,
    ordinal: usize,
) -> Result<String> {
    let now = chrono::Local::now().time();
    match ctx.reminders.cancel_by_index(channel_id, ordinal, now).await? {
        Some(removed) => {
            info!("removed reminder {} from channel {channel_id}", removed.id);
            let active = ctx.reminders.active(channel_id, now).await?;
            Ok(format!(
                "✅ Reminder removed!\n⏰ Was: {} - {}\n\n{}",
                removed.fire_time,
                removed.message,
                format_list(&active)
            ))
        }
        None => Ok("❌ Invalid reminder number".to_string()),
    }
}
