pub mod guild_config_models;
pub mod guild_config_service;
pub mod guild_config_store;
pub mod permissions;

pub use guild_config_models::GuildConfig;
pub use guild_config_service::{GuildSettingsService, SettingsError, SettingsSummary};
pub use guild_config_store::{GuildConfigStore, StoreError};
pub use permissions::{Caller, GuildContext};
