//! Ledger command handlers
//!
//! Handles: add, income, categories, clear
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info};
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::{get_number_option, get_string_option};
use crate::database::EntryKind;
use crate::features::dialog::DialogMode;
use crate::features::ledger;

/// Handler for bookkeeping commands
pub struct LedgerHandler;

#[async_trait]
impl SlashCommandHandler for LedgerHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["add", "income", "categories", "clear"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        match command.data.name.as_str() {
            "add" => self.handle_entry(&ctx, serenity_ctx, command, EntryKind::Expense).await,
            "income" => self.handle_entry(&ctx, serenity_ctx, command, EntryKind::Income).await,
            "categories" => self.handle_categories(&ctx, serenity_ctx, command).await,
            "clear" => self.handle_clear(&ctx, serenity_ctx, command).await,
            _ => Ok(()),
        }
    }
}

impl LedgerHandler {
    /// `/add` and `/income`: record directly when both options are present,
    /// otherwise arm the dialog mode and prompt for chat input.
    async fn handle_entry(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        kind: EntryKind,
    ) -> Result<()> {
        let channel_id = command.channel_id.0;
        let amount = get_number_option(&command.data.options, "amount");
        let category = get_string_option(
            &command.data.options,
            match kind {
                EntryKind::Expense => "category",
                EntryKind::Income => "source",
            },
        );

        if let (Some(amount), Some(category)) = (amount, category) {
            let reply = ledger::record_entry(&ctx.database, channel_id, &category, amount, kind)
                .await?;
            info!("recorded {} of {amount:.2} in channel {channel_id}", kind.as_str());
            return ctx
                .respond_transient(serenity_ctx, command, &reply, ctx.ttls.notice)
                .await;
        }

        // Partial or missing options: fall back to the dialog flow.
        let (mode, prompt) = match kind {
            EntryKind::Expense => (
                "add_expense",
                "Enter the category and amount\n💡 Example: Food 500 or 500 Food",
            ),
            EntryKind::Income => (
                "add_income",
                "Enter the source and amount\n💡 Example: Salary 2000",
            ),
        };
        ctx.dialog_state
            .set(channel_id, DialogMode::Dialog(mode.to_string()));
        debug!("channel {channel_id} entered dialog mode {mode}");
        ctx.respond_transient(serenity_ctx, command, prompt, ctx.ttls.notice)
            .await
    }

    async fn handle_categories(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let channel_id = command.channel_id.0;
        let action =
            get_string_option(&command.data.options, "action").unwrap_or_else(|| "list".into());

        if action == "delete" {
            return match ledger::deletion_prompt(&ctx.database, channel_id).await? {
                Some(prompt) => {
                    ctx.dialog_state
                        .set(channel_id, DialogMode::AwaitingCategoryChoice);
                    ctx.respond_transient(serenity_ctx, command, &prompt, ctx.ttls.notice)
                        .await
                }
                None => {
                    ctx.respond_transient(
                        serenity_ctx,
                        command,
                        "📝 You have no categories to delete yet",
                        ctx.ttls.notice,
                    )
                    .await
                }
            };
        }

        let categories = ctx.database.categories(channel_id).await?;
        let reply = if categories.is_empty() {
            "📝 No saved categories yet".to_string()
        } else {
            let mut list = String::from("📁 Your categories:\n");
            for (i, category) in categories.iter().enumerate() {
                list.push_str(&format!("{}. {}\n", i + 1, ledger::capitalize(category)));
            }
            list
        };
        ctx.respond_transient(serenity_ctx, command, &reply, ctx.ttls.notice)
            .await
    }

    async fn handle_clear(
        &self,
        ctx: &CommandContext,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let channel_id = command.channel_id.0;
        let reply = ledger::clear_history(&ctx.database, channel_id).await?;
        info!("cleared ledger history for channel {channel_id}");
        // Permanent: the user should keep the receipt of a destructive action.
        ctx.respond_transient(serenity_ctx, command, &reply, 0).await
    }
}
