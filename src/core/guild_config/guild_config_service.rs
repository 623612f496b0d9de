// Settings service - the manager-gated operations behind the config commands.
//
// Every mutating operation follows the same steps:
// 1. Take the write lock so read-modify-write cycles never interleave
// 2. Check the caller is a manager (no mutation otherwise)
// 3. Apply the change and persist the whole mapping once
//
// A failed persist is logged and absorbed; the in-memory state stays
// authoritative until the next successful write.

use super::guild_config_models::GuildConfig;
use super::guild_config_store::GuildConfigStore;
use super::permissions::{is_manager, Caller, GuildContext};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("You are not allowed to manage Angel settings.")]
    NotManager,
}

/// What `/angel_info` needs to render a reply.
#[derive(Debug, Clone)]
pub struct SettingsSummary {
    pub config: GuildConfig,
    pub caller_is_manager: bool,
}

pub struct GuildSettingsService<S: GuildConfigStore> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: GuildConfigStore> GuildSettingsService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Re-read the backing store.
    pub async fn reload(&self) {
        let _guard = self.write_lock.lock().await;
        self.store.reload().await;
        let guilds = self.store.all_configs().await.len();
        tracing::info!(guilds, "Guild config loaded");
    }

    pub async fn get_config(&self, guild_id: u64) -> GuildConfig {
        self.store.get_or_create(guild_id).await
    }

    pub async fn summary(&self, caller: &Caller, guild: &GuildContext) -> SettingsSummary {
        let config = self.store.get_or_create(guild.guild_id).await;
        let caller_is_manager = is_manager(caller, Some(guild), &config);
        SettingsSummary {
            config,
            caller_is_manager,
        }
    }

    pub async fn set_intake_channel(
        &self,
        caller: &Caller,
        guild: &GuildContext,
        channel_id: u64,
    ) -> Result<GuildConfig, SettingsError> {
        self.update(caller, guild, "set_intake", |config| {
            config.intake_channel_id = Some(channel_id);
        })
        .await
    }

    /// Lift the intake restriction so `/angel` works in any channel again.
    pub async fn clear_intake_channel(
        &self,
        caller: &Caller,
        guild: &GuildContext,
    ) -> Result<GuildConfig, SettingsError> {
        self.update(caller, guild, "clear_intake", |config| {
            config.intake_channel_id = None;
        })
        .await
    }

    pub async fn set_mod_channel(
        &self,
        caller: &Caller,
        guild: &GuildContext,
        channel_id: u64,
    ) -> Result<GuildConfig, SettingsError> {
        self.update(caller, guild, "set_logs", |config| {
            config.mod_channel_id = Some(channel_id);
        })
        .await
    }

    /// Grant (`allow = true`) or revoke manager rights for a role.
    pub async fn set_manager_role(
        &self,
        caller: &Caller,
        guild: &GuildContext,
        role_id: u64,
        allow: bool,
    ) -> Result<GuildConfig, SettingsError> {
        self.update(caller, guild, "set_manager", |config| {
            if allow {
                config.manager_role_ids.insert(role_id);
            } else {
                config.manager_role_ids.remove(&role_id);
            }
        })
        .await
    }

    /// One-shot setup: both channels plus one additional manager role,
    /// persisted in a single write.
    pub async fn full_setup(
        &self,
        caller: &Caller,
        guild: &GuildContext,
        intake_channel_id: u64,
        mod_channel_id: u64,
        manager_role_id: u64,
    ) -> Result<GuildConfig, SettingsError> {
        self.update(caller, guild, "setup", |config| {
            config.intake_channel_id = Some(intake_channel_id);
            config.mod_channel_id = Some(mod_channel_id);
            config.manager_role_ids.insert(manager_role_id);
        })
        .await
    }

    async fn update<F>(
        &self,
        caller: &Caller,
        guild: &GuildContext,
        operation: &'static str,
        apply: F,
    ) -> Result<GuildConfig, SettingsError>
    where
        F: FnOnce(&mut GuildConfig) + Send,
    {
        let guild_id = guild.guild_id;
        let _guard = self.write_lock.lock().await;

        let mut config = self.store.get_or_create(guild_id).await;
        if !is_manager(caller, Some(guild), &config) {
            tracing::info!(
                guild_id,
                user_id = caller.user_id,
                operation,
                "Refused settings change from non-manager"
            );
            return Err(SettingsError::NotManager);
        }

        apply(&mut config);

        if let Err(e) = self.store.save_config(guild_id, config.clone()).await {
            tracing::error!(
                guild_id,
                operation,
                error = %e,
                "Failed to persist guild config; keeping in-memory state"
            );
        } else {
            tracing::info!(guild_id, user_id = caller.user_id, operation, "Guild config updated");
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::guild_config::StoreError;
    use crate::infra::guild_config::InMemoryGuildConfigStore;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Wraps the in-memory store and counts persisted writes.
    struct CountingStore {
        inner: InMemoryGuildConfigStore,
        saves: AtomicUsize,
    }

    impl CountingStore {
        fn new() -> Self {
            Self {
                inner: InMemoryGuildConfigStore::new(),
                saves: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl GuildConfigStore for CountingStore {
        async fn reload(&self) {
            self.inner.reload().await
        }

        async fn get_or_create(&self, guild_id: u64) -> GuildConfig {
            self.inner.get_or_create(guild_id).await
        }

        async fn save_config(&self, guild_id: u64, config: GuildConfig) -> Result<(), StoreError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save_config(guild_id, config).await
        }

        async fn all_configs(&self) -> HashMap<u64, GuildConfig> {
            self.inner.all_configs().await
        }
    }

    const GUILD: GuildContext = GuildContext {
        guild_id: 1,
        owner_id: Some(500),
    };

    fn admin() -> Caller {
        Caller {
            user_id: 2,
            manage_guild: true,
            role_ids: Some(vec![]),
        }
    }

    fn member(roles: Vec<u64>) -> Caller {
        Caller {
            user_id: 3,
            manage_guild: false,
            role_ids: Some(roles),
        }
    }

    #[tokio::test]
    async fn test_full_setup_by_manager_persists_once() {
        let service = GuildSettingsService::new(CountingStore::new());

        let config = service.full_setup(&admin(), &GUILD, 10, 20, 30).await.unwrap();

        assert_eq!(config.intake_channel_id, Some(10));
        assert_eq!(config.mod_channel_id, Some(20));
        assert!(config.manager_role_ids.contains(&30));
        assert_eq!(service.store.saves.load(Ordering::SeqCst), 1);
        assert_eq!(service.get_config(1).await, config);
    }

    #[tokio::test]
    async fn test_full_setup_by_non_manager_changes_nothing() {
        let service = GuildSettingsService::new(CountingStore::new());

        let result = service.full_setup(&member(vec![]), &GUILD, 10, 20, 30).await;

        assert!(matches!(result, Err(SettingsError::NotManager)));
        assert_eq!(service.store.saves.load(Ordering::SeqCst), 0);
        assert_eq!(service.get_config(1).await, GuildConfig::default());
    }

    #[tokio::test]
    async fn test_manager_role_grants_access_after_setup() {
        let service = GuildSettingsService::new(InMemoryGuildConfigStore::new());
        service.full_setup(&admin(), &GUILD, 10, 20, 30).await.unwrap();

        let result = service.set_intake_channel(&member(vec![30]), &GUILD, 11).await;

        assert_eq!(result.unwrap().intake_channel_id, Some(11));
    }

    #[tokio::test]
    async fn test_set_manager_role_toggles_without_duplicates() {
        let service = GuildSettingsService::new(InMemoryGuildConfigStore::new());

        service.set_manager_role(&admin(), &GUILD, 30, true).await.unwrap();
        let config = service.set_manager_role(&admin(), &GUILD, 30, true).await.unwrap();
        assert_eq!(config.manager_role_ids.len(), 1);

        let config = service.set_manager_role(&admin(), &GUILD, 31, true).await.unwrap();
        assert_eq!(config.manager_role_ids.len(), 2);

        let config = service.set_manager_role(&admin(), &GUILD, 30, false).await.unwrap();
        assert!(!config.manager_role_ids.contains(&30));
        assert!(config.manager_role_ids.contains(&31));

        // Removing a role that is not configured is a no-op.
        let config = service.set_manager_role(&admin(), &GUILD, 99, false).await.unwrap();
        assert_eq!(config.manager_role_ids.len(), 1);
    }

    #[tokio::test]
    async fn test_clear_intake_reopens_all_channels() {
        let service = GuildSettingsService::new(InMemoryGuildConfigStore::new());
        service.set_intake_channel(&admin(), &GUILD, 42).await.unwrap();

        let config = service.clear_intake_channel(&admin(), &GUILD).await.unwrap();

        assert_eq!(config.intake_channel_id, None);
        assert_eq!(service.get_config(1).await.intake_channel_id, None);
    }

    #[tokio::test]
    async fn test_summary_reports_manager_status() {
        let service = GuildSettingsService::new(InMemoryGuildConfigStore::new());
        service.set_mod_channel(&admin(), &GUILD, 99).await.unwrap();

        let as_admin = service.summary(&admin(), &GUILD).await;
        let as_member = service.summary(&member(vec![]), &GUILD).await;

        assert!(as_admin.caller_is_manager);
        assert!(!as_member.caller_is_manager);
        assert_eq!(as_member.config.mod_channel_id, Some(99));
    }
}
