use super::invocation::{reply_private, resolve_caller, resolve_guild, NOT_IN_GUILD};
use crate::core::guild_config::SettingsSummary;
use crate::discord::{Context, Error};
use poise::serenity_prelude as serenity;

/// Show how Angel is set up on this server.
#[poise::command(slash_command)]
pub async fn angel_info(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild) = resolve_guild(ctx).await else {
        return reply_private(ctx, NOT_IN_GUILD).await;
    };
    let caller = resolve_caller(ctx).await;

    let summary = ctx.data().settings.summary(&caller, &guild).await;
    let embed = build_info_embed(&summary);

    ctx.send(
        poise::CreateReply::default()
            .embed(embed)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

pub fn build_info_embed(summary: &SettingsSummary) -> serenity::CreateEmbed {
    let embed = serenity::CreateEmbed::new()
        .title("Angel")
        .description(
            "Use `/angel` to quietly ask the moderators for help. \
             Only they will see your request.",
        )
        .color(0x5865F2);

    info_fields(summary)
        .into_iter()
        .fold(embed, |embed, (name, value)| embed.field(name, value, false))
}

/// Embed fields for `/angel_info`. Managers also see where alerts go and
/// who can change the settings.
fn info_fields(summary: &SettingsSummary) -> Vec<(&'static str, String)> {
    let config = &summary.config;

    let status = if config.mod_channel_id.is_some() {
        "Ready: requests reach the moderators."
    } else {
        "Not set up yet: requests cannot be delivered."
    };

    let mut fields = vec![
        ("Status", status.to_string()),
        (
            "Where to use /angel",
            config
                .intake_channel_id
                .map(|id| format!("<#{}>", id))
                .unwrap_or_else(|| "Any channel".to_string()),
        ),
    ];

    if summary.caller_is_manager {
        fields.push((
            "Moderator channel",
            config
                .mod_channel_id
                .map(|id| format!("<#{}>", id))
                .unwrap_or_else(|| "Not set (use `/angel_set_logs`)".to_string()),
        ));

        let roles = if config.manager_role_ids.is_empty() {
            "None (owner and Manage Server only)".to_string()
        } else {
            config
                .manager_role_ids
                .iter()
                .map(|id| format!("<@&{}>", id))
                .collect::<Vec<_>>()
                .join(", ")
        };
        fields.push(("Manager roles", roles));
    }

    fields
}
