use crate::core::guild_config::{GuildConfig, GuildConfigStore, StoreError};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;

/// Non-persistent config store used by the settings tests.
pub struct InMemoryGuildConfigStore {
    configs: DashMap<u64, GuildConfig>,
}

impl InMemoryGuildConfigStore {
    pub fn new() -> Self {
        Self {
            configs: DashMap::new(),
        }
    }
}

impl Default for InMemoryGuildConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GuildConfigStore for InMemoryGuildConfigStore {
    async fn reload(&self) {
        // Nothing backs this store.
    }

    async fn get_or_create(&self, guild_id: u64) -> GuildConfig {
        self.configs.entry(guild_id).or_default().clone()
    }

    async fn save_config(&self, guild_id: u64, config: GuildConfig) -> Result<(), StoreError> {
        self.configs.insert(guild_id, config);
        Ok(())
    }

    async fn all_configs(&self) -> HashMap<u64, GuildConfig> {
        self.configs
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lazy_creation() {
        let store = InMemoryGuildConfigStore::new();
        assert!(store.all_configs().await.is_empty());

        let config = store.get_or_create(456).await;
        assert_eq!(config, GuildConfig::default());
        assert_eq!(store.all_configs().await.len(), 1);
    }

    #[tokio::test]
    async fn test_save_replaces_entry() {
        let store = InMemoryGuildConfigStore::new();
        let config = GuildConfig {
            mod_channel_id: Some(99),
            ..Default::default()
        };

        store.save_config(456, config.clone()).await.unwrap();

        assert_eq!(store.get_or_create(456).await, config);
    }
}
