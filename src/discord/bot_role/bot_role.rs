// Angel's own identity role.
//
// On startup (and when joining a new guild) the bot makes sure a role with
// the configured name exists and that it holds it. Missing permissions are
// common here; they are logged per guild and never stop the bot.

use poise::serenity_prelude as serenity;

const CREATE_REASON: &str = "Role for angel safety bot";
const ASSIGN_REASON: &str = "Granting angel bot role";

/// Ensure the role exists in `guild_id` and is assigned to the bot.
pub async fn ensure_bot_role(
    ctx: &serenity::Context,
    guild_id: serenity::GuildId,
    role_name: &str,
) -> Result<(), serenity::Error> {
    let roles = guild_id.roles(&ctx.http).await?;

    let existing = find_role_by_name(roles.values().map(|r| (r.id, r.name.as_str())), role_name);

    let role_id = match existing {
        Some(role_id) => role_id,
        None => {
            let role = guild_id
                .create_role(
                    ctx,
                    serenity::EditRole::new()
                        .name(role_name)
                        .audit_log_reason(CREATE_REASON),
                )
                .await?;
            tracing::info!(guild_id = guild_id.get(), role_id = role.id.get(), "Created bot role");
            role.id
        }
    };

    let bot_id = ctx.cache.current_user().id;
    let me = guild_id.member(ctx, bot_id).await?;
    if !me.roles.contains(&role_id) {
        ctx.http
            .add_member_role(guild_id, bot_id, role_id, Some(ASSIGN_REASON))
            .await?;
        tracing::info!(guild_id = guild_id.get(), "Assigned bot role");
    }

    Ok(())
}

/// Run `ensure_bot_role` for each guild, logging failures.
pub async fn ensure_bot_role_everywhere(
    ctx: &serenity::Context,
    guild_ids: impl IntoIterator<Item = serenity::GuildId>,
    role_name: &str,
) {
    for guild_id in guild_ids {
        if let Err(e) = ensure_bot_role(ctx, guild_id, role_name).await {
            tracing::warn!(
                guild_id = guild_id.get(),
                operation = "ensure_bot_role",
                error = %e,
                "Could not set up bot role"
            );
        }
    }
}

/// First role whose name matches exactly.
fn find_role_by_name<'a>(
    roles: impl IntoIterator<Item = (serenity::RoleId, &'a str)>,
    name: &str,
) -> Option<serenity::RoleId> {
    roles
        .into_iter()
        .find(|(_, role_name)| *role_name == name)
        .map(|(id, _)| id)
}
