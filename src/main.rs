// This is the entry point of the Angel bot.
//
// **Architecture Overview:**
// - `core/` = Alert and settings logic (platform-agnostic)
// - `infra/` = Implementations of core traits (config storage)
// - `discord/` = Discord-specific adapters (commands, events)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Set up the Discord framework
// 4. Register commands and event handlers

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with several mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "discord/discord_layer.rs"]
mod discord;
#[path = "infra/infra_layer.rs"]
mod infra;

mod bot_config;

use crate::bot_config::BotConfig;
use crate::core::guild_config::GuildSettingsService;
use crate::discord::bot_role;
use crate::discord::commands::invocation::GENERIC_FAILURE;
use crate::discord::commands::presence;
use crate::discord::{Data, Error};
use crate::infra::guild_config::JsonGuildConfigStore;
use anyhow::Context as _;
use poise::serenity_prelude as serenity;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Event handler for non-command Discord events.
async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            if data.claim_startup() {
                let guild_ids: Vec<serenity::GuildId> =
                    data_about_bot.guilds.iter().map(|g| g.id).collect();
                spawn_startup_tasks(ctx.clone(), data, guild_ids);
            }
        }
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            // Guilds present at startup are handled by the startup tasks.
            if *is_new == Some(true) {
                tracing::info!(guild_id = guild.id.get(), "Joined guild");
                bot_role::ensure_bot_role_everywhere(ctx, [guild.id], &data.bot_role_name).await;
            }
        }
        _ => {}
    }

    Ok(())
}

/// First-connection work that talks to Discord once per guild. Runs in the
/// background so commands are served while it is in progress.
fn spawn_startup_tasks(ctx: serenity::Context, data: &Data, guild_ids: Vec<serenity::GuildId>) {
    let settings = Arc::clone(&data.settings);
    let bot_role_name = data.bot_role_name.clone();

    tokio::spawn(async move {
        // Pick up any edits made to the file while we were connecting.
        settings.reload().await;

        presence::on_ready(&ctx);
        bot_role::ensure_bot_role_everywhere(&ctx, guild_ids, &bot_role_name).await;
        tracing::info!("Startup tasks finished");
    });
}

/// Register slash commands globally (and in the dev guild, if configured).
async fn register_commands(
    ctx: &serenity::Context,
    commands: &[poise::Command<Data, Error>],
    dev_guild_id: Option<u64>,
) {
    match poise::builtins::register_globally(ctx, commands).await {
        Ok(()) => tracing::info!("Slash commands registered"),
        Err(e) => tracing::error!(error = %e, "Failed to register slash commands globally"),
    }

    if let Some(guild_id) = dev_guild_id {
        if let Err(e) =
            poise::builtins::register_in_guild(ctx, commands, serenity::GuildId::new(guild_id)).await
        {
            tracing::error!(guild_id, error = %e, "Failed to register slash commands in dev guild");
        }
    }
}

/// Last-resort handler: log it, tell the caller something went wrong, keep running.
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            tracing::error!(
                command = %ctx.command().qualified_name,
                guild_id = ?ctx.guild_id().map(|id| id.get()),
                error = %error,
                "Command failed"
            );
            let reply = poise::CreateReply::default()
                .content(GENERIC_FAILURE)
                .ephemeral(true);
            if let Err(e) = ctx.send(reply).await {
                tracing::warn!("Failed to send error notice: {}", e);
            }
        }
        other => {
            if let Err(e) = poise::builtins::on_error(other).await {
                tracing::error!("Error while handling error: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("angel_bot=info")),
        )
        .init();

    let config = BotConfig::from_env()?;

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================

    let store = JsonGuildConfigStore::new(&config.config_path);
    let settings = Arc::new(GuildSettingsService::new(store));

    // ========================================================================
    // DISCORD FRAMEWORK SETUP
    // ========================================================================

    // Interaction payloads carry member roles and permissions, so no
    // privileged member intent is needed.
    let intents = serenity::GatewayIntents::GUILDS;

    let bot_role_name = config.bot_role_name.clone();
    let dev_guild_id = config.dev_guild_id;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: discord::commands::all(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                tracing::info!(user = %ready.user.name, "Logged in");

                // Setup must always hand back `Data`; without it poise never
                // dispatches another interaction.
                register_commands(ctx, &framework.options().commands, dev_guild_id).await;

                Ok::<_, Error>(Data::new(settings, bot_role_name))
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .await
        .context("Error creating client")?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Shutting down...");
            shard_manager.shutdown_all().await;
        }
    });

    client.start().await.context("Error running bot")?;
    Ok(())
}
