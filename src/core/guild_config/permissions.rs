// Who may change Angel's settings in a guild.
//
// Pure function over data the Discord layer extracts from the interaction,
// so it can be tested without a gateway connection.

use super::guild_config_models::GuildConfig;

/// The invoking user, reduced to what the manager check needs.
#[derive(Debug, Clone, Default)]
pub struct Caller {
    pub user_id: u64,
    /// MANAGE_GUILD (or ADMINISTRATOR) as resolved by the platform.
    pub manage_guild: bool,
    /// Role ids from the caller's member record. `None` when the caller
    /// could not be resolved to a member.
    pub role_ids: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Copy)]
pub struct GuildContext {
    pub guild_id: u64,
    /// `None` if the guild could be neither read from cache nor fetched.
    pub owner_id: Option<u64>,
}

/// True if `caller` may manage Angel in `guild`.
pub fn is_manager(caller: &Caller, guild: Option<&GuildContext>, config: &GuildConfig) -> bool {
    let Some(guild) = guild else {
        return false;
    };

    if guild.owner_id == Some(caller.user_id) {
        return true;
    }

    if caller.manage_guild {
        return true;
    }

    match &caller.role_ids {
        Some(role_ids) => role_ids
            .iter()
            .any(|role_id| config.manager_role_ids.contains(role_id)),
        None => false,
    }
}
