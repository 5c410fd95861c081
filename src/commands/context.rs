//! Shared context for command handlers
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::core::config::Ttls;
use crate::database::Database;
use crate::features::dialog::DialogStateStore;
use crate::features::ephemeral::DeletionScheduler;
use crate::features::facts::FactsClient;
use crate::features::rates::RatesClient;
use crate::features::reminders::ReminderScheduler;
use crate::messenger::Messenger;

/// Shared context for all command handlers.
///
/// Carries the services most handlers need: the database, the dialog-state
/// store for multi-step input, the schedulers, and the outbound messenger.
#[derive(Clone)]
pub struct CommandContext {
    pub database: Database,
    pub dialog_state: Arc<DialogStateStore>,
    pub deletion: Arc<DeletionScheduler>,
    pub reminders: Arc<ReminderScheduler>,
    pub messenger: Messenger,
    pub rates: RatesClient,
    pub facts: FactsClient,
    pub ttls: Ttls,
}

impl CommandContext {
    /// Reply to a slash command with a transient message.
    ///
    /// The interaction response is fetched back and registered with the
    /// deletion queue, so command replies obey the same bounded lifetimes as
    /// every other bot message. `ttl_seconds <= 0` leaves the reply permanent.
    pub async fn respond_transient(
        &self,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
        text: &str,
        ttl_seconds: i64,
    ) -> Result<()> {
        command
            .create_interaction_response(&serenity_ctx.http, |response| {
                response
                    .kind(InteractionResponseType::ChannelMessageWithSource)
                    .interaction_response_data(|msg| msg.content(text))
            })
            .await?;

        if ttl_seconds > 0 {
            let reply = command.get_interaction_response(&serenity_ctx.http).await?;
            self.deletion
                .schedule(command.channel_id.0, reply.id.0, ttl_seconds);
        }
        Ok(())
    }
}
