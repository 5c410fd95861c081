use anyhow::Result;
use dotenvy::dotenv;
use log::{debug, error, info, warn};
use serenity::async_trait;
use serenity::http::Http;
use serenity::model::application::interaction::Interaction;
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::GuildId;
use serenity::prelude::*;
use std::sync::Arc;

use tally::commands::{
    default_registry, register_global_commands, register_guild_commands, CommandContext,
    CommandRegistry,
};
use tally::core::{Config, TaskHandle};
use tally::database::Database;
use tally::delivery::DiscordSink;
use tally::dispatcher::MessageDispatcher;
use tally::features::backup::BackupTask;
use tally::features::dialog::DialogStateStore;
use tally::features::ephemeral::DeletionScheduler;
use tally::features::facts::FactsClient;
use tally::features::ledger::DATETIME_FORMAT;
use tally::features::rates::RatesClient;
use tally::features::reminders::ReminderScheduler;
use tally::messenger::Messenger;

struct Handler {
    ctx: Arc<CommandContext>,
    registry: CommandRegistry,
    dispatcher: MessageDispatcher,
    guild_id: Option<GuildId>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, _serenity_ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let channel_id = msg.channel_id.0;
        let now = chrono::Local::now()
            .naive_local()
            .format(DATETIME_FORMAT)
            .to_string();
        if let Err(e) = self
            .ctx
            .database
            .ensure_user(channel_id, &msg.author.name, &now)
            .await
        {
            warn!("failed to register user for channel {channel_id}: {e}");
        }

        match self.dispatcher.dispatch(channel_id, &msg.content).await {
            Ok(consumed) => {
                if consumed {
                    debug!("dialog input consumed in channel {channel_id}");
                }
            }
            Err(e) => error!("error handling message in channel {channel_id}: {e}"),
        }
    }

    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("🎉 {} is connected and ready!", ready.user.name);
        info!("📡 Connected to {} guild(s)", ready.guilds.len());
        info!("🤖 Bot ID: {}", ready.user.id);

        let result = match self.guild_id {
            Some(guild_id) => register_guild_commands(&ctx, guild_id).await,
            None => register_global_commands(&ctx).await,
        };
        if let Err(e) = result {
            error!("Failed to register slash commands: {e}");
        }
    }

    async fn interaction_create(&self, serenity_ctx: Context, interaction: Interaction) {
        if let Interaction::ApplicationCommand(command) = interaction {
            let name = command.data.name.clone();
            debug!("slash command /{name} in channel {}", command.channel_id);

            match self.registry.get(&name) {
                Some(handler) => {
                    if let Err(e) = handler
                        .handle(Arc::clone(&self.ctx), &serenity_ctx, &command)
                        .await
                    {
                        error!("Error handling /{name}: {e}");
                    }
                }
                None => warn!("No handler registered for /{name}"),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting tally bot...");

    let database = Database::new(&config.database_path).await?;

    // Standalone REST handle for the schedulers; the gateway client below
    // keeps its own.
    let http = Arc::new(Http::new(&config.discord_token));
    let sink = Arc::new(DiscordSink::new(Arc::clone(&http)));

    let deletion = DeletionScheduler::new(sink.clone());
    let messenger = Messenger::new(sink, Arc::clone(&deletion));
    let reminders = ReminderScheduler::new(
        database.clone(),
        messenger.clone(),
        config.ttls.reminder,
    );
    let dialog_state = DialogStateStore::new(config.dialog_state_ttl);

    let ctx = Arc::new(CommandContext {
        database: database.clone(),
        dialog_state: Arc::clone(&dialog_state),
        deletion: Arc::clone(&deletion),
        reminders: Arc::clone(&reminders),
        messenger,
        rates: RatesClient::new(config.rates_url.clone()),
        facts: FactsClient::new(config.fact_url.clone()),
        ttls: config.ttls,
    });

    // Background sweeps: dialog-state expiry, deletion drain, reminder fire.
    let mut tasks: Vec<TaskHandle> = vec![
        Arc::clone(&dialog_state).spawn_sweeper(config.state_sweep_interval),
        Arc::clone(&deletion).spawn_worker(config.deletion_sweep_interval),
        Arc::clone(&reminders).spawn_sweeper(config.reminder_sweep_interval),
    ];

    if let Some(backup_channel) = config.backup_channel_id {
        let backup = BackupTask::new(
            Arc::clone(&http),
            config.database_path.clone(),
            backup_channel,
        );
        tasks.push(backup.spawn(config.backup_interval));
    } else {
        info!("BACKUP_CHANNEL_ID not set - database backups disabled");
    }

    let guild_id = config
        .discord_guild_id
        .as_ref()
        .and_then(|id| id.parse::<u64>().ok())
        .map(GuildId);

    let handler = Handler {
        ctx: Arc::clone(&ctx),
        registry: default_registry(),
        dispatcher: MessageDispatcher::new(ctx),
        guild_id,
    };

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.discord_token, intents)
        .event_handler(handler)
        .await?;

    info!("Bot configured successfully. Connecting to Discord gateway...");

    let start_result = client.start().await;

    // Stop the sweeps promptly instead of leaving them running during
    // teardown.
    for task in &tasks {
        task.shutdown().await;
    }

    if let Err(why) = start_result {
        error!("Gateway connection failed: {why:?}");
        return Err(anyhow::anyhow!(
            "Failed to establish gateway connection: {}",
            why
        ));
    }

    Ok(())
}
