use super::guild_config_models::GuildConfig;
use async_trait::async_trait;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Storage port for per-guild settings.
///
/// Implementations keep an in-memory mirror that is authoritative for the
/// life of the process. A failed write leaves the mirror updated.
#[async_trait]
pub trait GuildConfigStore: Send + Sync {
    /// Replace the mirror with the backing data. An unreadable source
    /// yields an empty mapping rather than an error.
    async fn reload(&self);

    /// Existing entry for `guild_id`, or a freshly inserted default one.
    async fn get_or_create(&self, guild_id: u64) -> GuildConfig;

    /// Store `config` in the mirror, then persist the whole mapping.
    async fn save_config(&self, guild_id: u64, config: GuildConfig) -> Result<(), StoreError>;

    async fn all_configs(&self) -> HashMap<u64, GuildConfig>;
}
