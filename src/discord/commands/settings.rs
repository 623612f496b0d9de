// Manager-only configuration commands.
//
// Each one extracts ids from the interaction, calls the settings service
// (which performs the manager check before touching anything) and answers
// privately.

use super::invocation::{reply_private, resolve_caller, resolve_guild, NOT_IN_GUILD, NOT_MANAGER};
use crate::core::guild_config::{GuildConfig, SettingsError};
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;
use poise::serenity_prelude::Mentionable;

/// Do initial setup for Angel (intake, logs, manager).
#[poise::command(slash_command)]
pub async fn angel_setup(
    ctx: Context<'_>,
    #[description = "Channel where users will invoke /angel."]
    #[channel_types("Text")]
    intake_channel: serenity::GuildChannel,
    #[description = "Channel where Angel will notify moderators."]
    #[channel_types("Text")]
    mod_channel: serenity::GuildChannel,
    #[description = "Role that should be allowed to manage Angel settings."]
    manager_role: serenity::Role,
) -> Result<(), Error> {
    let Some(guild) = resolve_guild(ctx).await else {
        return reply_private(ctx, NOT_IN_GUILD).await;
    };
    let caller = resolve_caller(ctx).await;

    let result = ctx
        .data()
        .settings
        .full_setup(
            &caller,
            &guild,
            intake_channel.id.get(),
            mod_channel.id.get(),
            manager_role.id.get(),
        )
        .await;

    respond(ctx, result, || {
        format!(
            "Angel setup complete:\n\
             - Intake channel: {}\n\
             - Mod log channel: {}\n\
             - Manager role added: {}",
            intake_channel.mention(),
            mod_channel.mention(),
            manager_role.mention()
        )
    })
    .await
}

/// Set the intake channel for /angel requests.
#[poise::command(slash_command)]
pub async fn angel_set_intake(
    ctx: Context<'_>,
    #[description = "Channel where users should run /angel."]
    #[channel_types("Text")]
    channel: serenity::GuildChannel,
) -> Result<(), Error> {
    let Some(guild) = resolve_guild(ctx).await else {
        return reply_private(ctx, NOT_IN_GUILD).await;
    };
    let caller = resolve_caller(ctx).await;

    let result = ctx
        .data()
        .settings
        .set_intake_channel(&caller, &guild, channel.id.get())
        .await;

    respond(ctx, result, || {
        format!("Intake channel set to {}.", channel.mention())
    })
    .await
}

/// Allow /angel in any channel again.
#[poise::command(slash_command)]
pub async fn angel_clear_intake(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild) = resolve_guild(ctx).await else {
        return reply_private(ctx, NOT_IN_GUILD).await;
    };
    let caller = resolve_caller(ctx).await;

    let result = ctx
        .data()
        .settings
        .clear_intake_channel(&caller, &guild)
        .await;

    respond(ctx, result, || {
        "Intake channel cleared. /angel can now be used in any channel.".to_string()
    })
    .await
}

/// Set the moderator log channel for Angel alerts.
#[poise::command(slash_command)]
pub async fn angel_set_logs(
    ctx: Context<'_>,
    #[description = "Channel where Angel should post alerts for moderators."]
    #[channel_types("Text")]
    channel: serenity::GuildChannel,
) -> Result<(), Error> {
    let Some(guild) = resolve_guild(ctx).await else {
        return reply_private(ctx, NOT_IN_GUILD).await;
    };
    let caller = resolve_caller(ctx).await;

    let result = ctx
        .data()
        .settings
        .set_mod_channel(&caller, &guild, channel.id.get())
        .await;

    respond(ctx, result, || {
        format!("Moderator log channel set to {}.", channel.mention())
    })
    .await
}

/// Add or remove human roles allowed to manage Angel.
#[poise::command(slash_command)]
pub async fn angel_set_manager(
    ctx: Context<'_>,
    #[description = "The role to grant or revoke Angel manager permissions."] role: serenity::Role,
    #[description = "Whether this role should be allowed to manage Angel (True) or disallowed (False)."]
    allow: bool,
) -> Result<(), Error> {
    let Some(guild) = resolve_guild(ctx).await else {
        return reply_private(ctx, NOT_IN_GUILD).await;
    };
    let caller = resolve_caller(ctx).await;

    let result = ctx
        .data()
        .settings
        .set_manager_role(&caller, &guild, role.id.get(), allow)
        .await;

    respond(ctx, result, || {
        let verb = if allow {
            "now allowed to"
        } else {
            "no longer allowed to"
        };
        format!("Role {} is {} manage Angel settings.", role.mention(), verb)
    })
    .await
}

/// Shared reply for every settings command.
async fn respond(
    ctx: Context<'_>,
    result: Result<GuildConfig, SettingsError>,
    confirmation: impl FnOnce() -> String,
) -> Result<(), Error> {
    reply_private(ctx, settings_reply(&result, confirmation)).await
}

fn settings_reply(
    result: &Result<GuildConfig, SettingsError>,
    confirmation: impl FnOnce() -> String,
) -> String {
    match result {
        Ok(_) => confirmation(),
        Err(SettingsError::NotManager) => NOT_MANAGER.to_string(),
    }
}
