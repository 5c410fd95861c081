//! Fact command handler
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.4.0

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;

pub struct FactHandler;

#[async_trait]
impl SlashCommandHandler for FactHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["fact"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let fact = ctx.facts.random_fact().await;
        // Facts keep the long default lifetime rather than the short notice one.
        ctx.respond_transient(serenity_ctx, command, &fact, ctx.ttls.default)
            .await
    }
}
