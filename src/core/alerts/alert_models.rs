use chrono::{DateTime, Utc};

/// Identity details of the member raising an alert, captured as they were
/// at the moment of the request.
#[derive(Debug, Clone)]
pub struct AlertCaller {
    pub user_id: u64,
    pub username: String,
    /// Pre-migration discriminator; `None` or `Some(0)` for migrated accounts.
    pub discriminator: Option<u16>,
    pub display_name: String,
}

impl AlertCaller {
    /// `name#1234` for accounts that still carry a legacy discriminator.
    pub fn legacy_tag(&self) -> Option<String> {
        self.discriminator
            .filter(|d| *d != 0)
            .map(|d| format!("{}#{:04}", self.username, d))
    }
}

/// A single `/angel` request. Built per invocation and consumed once.
#[derive(Debug, Clone)]
pub struct AlertEvent {
    pub caller: AlertCaller,
    pub guild_id: u64,
    pub source_channel_id: u64,
    pub message: Option<String>,
    pub raised_at: DateTime<Utc>,
}

impl AlertEvent {
    /// The caller's message, treating blank input as absent.
    pub fn message_text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}
