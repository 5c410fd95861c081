//! Rate command handler
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.3.0

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::get_string_option;

pub struct RatesHandler;

#[async_trait]
impl SlashCommandHandler for RatesHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["rate"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let currency =
            get_string_option(&command.data.options, "currency").unwrap_or_else(|| "USD".into());
        let reply = ctx.rates.rate_reply(&currency).await;
        ctx.respond_transient(serenity_ctx, command, &reply, ctx.ttls.notice)
            .await
    }
}
