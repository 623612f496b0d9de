// Discord layer - commands, event handlers and SDK adapters.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "alerts/channel_sink.rs"]
pub mod alert_sink;

#[path = "bot_role/bot_role.rs"]
pub mod bot_role;

use crate::core::guild_config::GuildSettingsService;
use crate::infra::guild_config::JsonGuildConfigStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared state handed to every command.
pub struct Data {
    pub settings: Arc<GuildSettingsService<JsonGuildConfigStore>>,
    /// Name of the role Angel creates for itself in each guild.
    pub bot_role_name: String,
    startup_claimed: AtomicBool,
}

impl Data {
    pub fn new(
        settings: Arc<GuildSettingsService<JsonGuildConfigStore>>,
        bot_role_name: String,
    ) -> Self {
        Self {
            settings,
            bot_role_name,
            startup_claimed: AtomicBool::new(false),
        }
    }

    /// True exactly once: for the first `Ready` of the process. Later
    /// reconnects must not reload the config over in-memory state.
    pub fn claim_startup(&self) -> bool {
        !self.startup_claimed.swap(true, Ordering::SeqCst)
    }
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;
