// Process-level settings, read from the environment (and `.env`, if present).

use anyhow::{Context, Result};
use std::path::PathBuf;

const DEFAULT_CONFIG_PATH: &str = "angel_config.json";
const DEFAULT_BOT_ROLE_NAME: &str = "angel";

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub token: String,
    /// JSON file holding every guild's settings.
    pub config_path: PathBuf,
    pub bot_role_name: String,
    /// Also register commands here for instant updates while developing.
    pub dev_guild_id: Option<u64>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup("DISCORD_BOT_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .context("DISCORD_BOT_TOKEN environment variable is not set")?;

        let config_path = lookup("ANGEL_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

        let bot_role_name = lookup("ANGEL_BOT_ROLE_NAME")
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BOT_ROLE_NAME.to_string());

        let dev_guild_id = lookup("ANGEL_DEV_GUILD_ID")
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .with_context(|| format!("ANGEL_DEV_GUILD_ID is not a guild id: {raw}"))
            })
            .transpose()?;

        Ok(Self {
            token,
            config_path,
            bot_role_name,
            dev_guild_id,
        })
    }
}
