//! Report command handler
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use anyhow::Result;
use async_trait::async_trait;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::prelude::Context;
use std::sync::Arc;

use crate::commands::context::CommandContext;
use crate::commands::handler::SlashCommandHandler;
use crate::commands::slash::get_string_option;
use crate::features::reports::{self, ReportPeriod};

pub struct ReportHandler;

#[async_trait]
impl SlashCommandHandler for ReportHandler {
    fn command_names(&self) -> &'static [&'static str] {
        &["report"]
    }

    async fn handle(
        &self,
        ctx: Arc<CommandContext>,
        serenity_ctx: &Context,
        command: &ApplicationCommandInteraction,
    ) -> Result<()> {
        let period = get_string_option(&command.data.options, "period")
            .and_then(|p| ReportPeriod::parse(&p))
            .unwrap_or(ReportPeriod::All);

        let now = chrono::Local::now().naive_local();
        let report = reports::generate(&ctx.database, command.channel_id.0, period, now).await?;
        ctx.respond_transient(serenity_ctx, command, &report, ctx.ttls.notice)
            .await
    }
}
