// Helpers shared by every command: turn the interaction into the plain
// values the core expects, and send caller-only replies.

use crate::core::guild_config::{Caller, GuildContext};
use crate::discord::{Context, Error};

pub const NOT_IN_GUILD: &str = "This command can only be used in a server.";
pub const NOT_MANAGER: &str = "You are not allowed to manage Angel settings.";
pub const GENERIC_FAILURE: &str = "Something went wrong while running that command.";

/// Guild id and owner for the invocation, or `None` outside a guild.
pub async fn resolve_guild(ctx: Context<'_>) -> Option<GuildContext> {
    let guild_id = ctx.guild_id()?;

    // Cache first; the guild ref must not be held across the fetch below.
    let cached_owner = ctx.guild().map(|guild| guild.owner_id.get());
    let owner_id = match cached_owner {
        Some(owner_id) => Some(owner_id),
        None => ctx.partial_guild().await.map(|guild| guild.owner_id.get()),
    };

    if owner_id.is_none() {
        tracing::warn!(guild_id = guild_id.get(), "Could not resolve guild owner");
    }

    Some(GuildContext {
        guild_id: guild_id.get(),
        owner_id,
    })
}

/// The invoking user with the permissions and roles Discord sent along.
pub async fn resolve_caller(ctx: Context<'_>) -> Caller {
    let user_id = ctx.author().id.get();

    match ctx.author_member().await {
        Some(member) => Caller {
            user_id,
            manage_guild: member
                .permissions
                .map(|p| p.manage_guild() || p.administrator())
                .unwrap_or(false),
            role_ids: Some(member.roles.iter().map(|role| role.get()).collect()),
        },
        None => Caller {
            user_id,
            manage_guild: false,
            role_ids: None,
        },
    }
}

/// Reply visible only to the invoking user.
pub async fn reply_private(ctx: Context<'_>, content: impl Into<String>) -> Result<(), Error> {
    ctx.send(
        poise::CreateReply::default()
            .content(content)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}
