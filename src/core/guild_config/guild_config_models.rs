use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Angel settings for a single guild.
///
/// Stored as one entry of the config file, keyed by guild id. Every field
/// defaults to empty so a fresh guild (or a partially written entry) is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildConfig {
    /// Channel where `/angel` must be used. `None` means anywhere.
    #[serde(default)]
    pub intake_channel_id: Option<u64>,
    /// Channel that receives alert notifications.
    #[serde(default)]
    pub mod_channel_id: Option<u64>,
    /// Roles whose members may change these settings.
    #[serde(default)]
    pub manager_role_ids: BTreeSet<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unconfigured() {
        let config = GuildConfig::default();
        assert_eq!(config.intake_channel_id, None);
        assert_eq!(config.mod_channel_id, None);
        assert!(config.manager_role_ids.is_empty());
    }

    #[test]
    fn test_parses_file_entry_with_nulls_and_missing_fields() {
        let raw = r#"{ "intake_channel_id": null, "mod_channel_id": 99 }"#;
        let config: GuildConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.intake_channel_id, None);
        assert_eq!(config.mod_channel_id, Some(99));
        assert!(config.manager_role_ids.is_empty());
    }

    #[test]
    fn test_duplicate_role_ids_collapse() {
        let raw = r#"{ "manager_role_ids": [30, 30, 31] }"#;
        let config: GuildConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.manager_role_ids.len(), 2);
    }
}
