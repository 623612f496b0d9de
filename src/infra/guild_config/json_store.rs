use crate::core::guild_config::{GuildConfig, GuildConfigStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// JSON-backed config store. The whole mapping lives in one file:
/// { "<guild_id>": { "intake_channel_id": .., "mod_channel_id": .., "manager_role_ids": [..] } }
pub struct JsonGuildConfigStore {
    path: PathBuf,
    cache: RwLock<HashMap<u64, GuildConfig>>,
}

impl JsonGuildConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let cache = RwLock::new(read_config_file(&path));
        Self { path, cache }
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let cache = self.cache.read().await;
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &*cache)?;
        writer.flush()?;
        Ok(())
    }
}

/// Missing or unparsable files load as an empty mapping.
fn read_config_file(path: &Path) -> HashMap<u64, GuildConfig> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "No guild config file yet, starting empty");
        return HashMap::new();
    }

    let parsed = std::fs::read_to_string(path)
        .map_err(StoreError::from)
        .and_then(|raw| serde_json::from_str(&raw).map_err(StoreError::from));

    match parsed {
        Ok(configs) => configs,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "Could not read guild config file, starting empty"
            );
            HashMap::new()
        }
    }
}

#[async_trait]
impl GuildConfigStore for JsonGuildConfigStore {
    async fn reload(&self) {
        let fresh = read_config_file(&self.path);
        *self.cache.write().await = fresh;
    }

    async fn get_or_create(&self, guild_id: u64) -> GuildConfig {
        if let Some(config) = self.cache.read().await.get(&guild_id) {
            return config.clone();
        }

        let mut cache = self.cache.write().await;
        cache.entry(guild_id).or_default().clone()
    }

    async fn save_config(&self, guild_id: u64, config: GuildConfig) -> Result<(), StoreError> {
        let mut cache = self.cache.write().await;
        cache.insert(guild_id, config);
        drop(cache); // Release lock before persisting
        self.persist().await
    }

    async fn all_configs(&self) -> HashMap<u64, GuildConfig> {
        self.cache.read().await.clone()
    }
}
