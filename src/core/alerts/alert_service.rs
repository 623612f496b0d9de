// Alert dispatch - decides whether an `/angel` request can be delivered,
// renders the moderator-facing record and hands it to a sink.
//
// NO Discord dependencies here. The Discord layer provides an `AlertSink`
// that posts to a channel; tests provide one that records calls.

use super::alert_models::AlertEvent;
use crate::core::guild_config::GuildConfig;
use async_trait::async_trait;
use thiserror::Error;

/// Caller text longer than this is cut so the record fits one message.
const MAX_MESSAGE_CHARS: usize = 1500;
const EMPTY_MESSAGE_PLACEHOLDER: &str = "(no message provided)";

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("no moderator channel is configured")]
    NotConfigured,

    #[error("alerts must be raised in channel {intake_channel_id}")]
    WrongChannel { intake_channel_id: u64 },

    #[error("failed to deliver alert to channel {channel_id}: {reason}")]
    Delivery { channel_id: u64, reason: String },
}

/// Where a delivered alert went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertReceipt {
    pub mod_channel_id: u64,
}

/// Outbound port for moderator notifications.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn deliver(&self, channel_id: u64, record: &str) -> anyhow::Result<()>;
}

/// Validate `event` against the guild's settings and deliver it once.
///
/// Nothing is sent unless a mod channel is configured and the request came
/// from the intake channel (when one is set). Delivery is never retried.
pub async fn raise_alert<K>(
    config: &GuildConfig,
    event: &AlertEvent,
    sink: &K,
) -> Result<AlertReceipt, AlertError>
where
    K: AlertSink + ?Sized,
{
    let mod_channel_id = config.mod_channel_id.ok_or(AlertError::NotConfigured)?;

    if let Some(intake_channel_id) = config.intake_channel_id {
        if intake_channel_id != event.source_channel_id {
            return Err(AlertError::WrongChannel { intake_channel_id });
        }
    }

    let record = format_alert_record(event);
    sink.deliver(mod_channel_id, &record)
        .await
        .map_err(|e| AlertError::Delivery {
            channel_id: mod_channel_id,
            reason: e.to_string(),
        })?;

    tracing::info!(
        guild_id = event.guild_id,
        user_id = event.caller.user_id,
        channel_id = mod_channel_id,
        "Alert delivered"
    );

    Ok(AlertReceipt { mod_channel_id })
}

/// Plain-text record posted to moderators. Mentions are rendered but the
/// sink is expected to suppress pings.
pub fn format_alert_record(event: &AlertEvent) -> String {
    let caller = &event.caller;
    let mut lines = vec![
        "🚨 **Angel alert raised**".to_string(),
        format!("User (mention): <@{}>", caller.user_id),
        format!("Username: {}", caller.username),
    ];

    if let Some(tag) = caller.legacy_tag() {
        lines.push(format!("Legacy tag: {}", tag));
    }

    lines.push(format!("Display name: {}", caller.display_name));
    lines.push(format!("User ID: {}", caller.user_id));
    lines.push(format!("Channel: <#{}>", event.source_channel_id));
    lines.push(format!(
        "Raised at: <t:{}:F> ({})",
        event.raised_at.timestamp(),
        event.raised_at.to_rfc3339()
    ));

    let message = match event.message_text() {
        Some(text) => truncate_chars(text, MAX_MESSAGE_CHARS),
        None => EMPTY_MESSAGE_PLACEHOLDER.to_string(),
    };
    lines.push(format!("Message: {}", message));

    lines.join("\n")
}

fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alerts::AlertCaller;
    use chrono::{TimeZone, Utc};
    use std::sync::Mutex;

    /// Records every delivery instead of talking to Discord.
    #[derive(Default)]
    struct RecordingSink {
        sent: Mutex<Vec<(u64, String)>>,
        fail: bool,
    }

    #[async_trait]
    impl AlertSink for RecordingSink {
        async fn deliver(&self, channel_id: u64, record: &str) -> anyhow::Result<()> {
            if self.fail {
                anyhow::bail!("Missing Permissions");
            }
            self.sent
                .lock()
                .unwrap()
                .push((channel_id, record.to_string()));
            Ok(())
        }
    }

    fn event(channel_id: u64, message: Option<&str>) -> AlertEvent {
        AlertEvent {
            caller: AlertCaller {
                user_id: 1234,
                username: "wren".to_string(),
                discriminator: None,
                display_name: "Wren the Brave".to_string(),
            },
            guild_id: 1,
            source_channel_id: channel_id,
            message: message.map(str::to_string),
            raised_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        }
    }

    fn config(intake: Option<u64>, mod_channel: Option<u64>) -> GuildConfig {
        GuildConfig {
            intake_channel_id: intake,
            mod_channel_id: mod_channel,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_unconfigured_mod_channel_sends_nothing() {
        let sink = RecordingSink::default();

        let result = raise_alert(&config(None, None), &event(7, Some("help")), &sink).await;

        assert!(matches!(result, Err(AlertError::NotConfigured)));
        assert!(sink.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_channel_is_redirected() {
        let sink = RecordingSink::default();

        let result = raise_alert(&config(Some(42), Some(99)), &event(7, None), &sink).await;

        assert!(matches!(
            result,
            Err(AlertError::WrongChannel {
                intake_channel_id: 42
            })
        ));
        assert!(sink.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_intake_delivers_once_to_mod_channel() {
        let sink = RecordingSink::default();

        let receipt = raise_alert(&config(None, Some(99)), &event(7, Some("need help")), &sink)
            .await
            .unwrap();

        assert_eq!(receipt.mod_channel_id, 99);
        let sent = sink.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        let (channel_id, record) = &sent[0];
        assert_eq!(*channel_id, 99);
        assert!(record.contains("1234"));
        assert!(record.contains("wren"));
        assert!(record.contains("need help"));
    }

    #[tokio::test]
    async fn test_matching_intake_channel_delivers() {
        let sink = RecordingSink::default();

        let result = raise_alert(&config(Some(42), Some(99)), &event(42, None), &sink).await;

        assert!(result.is_ok());
        assert_eq!(sink.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delivery_failure_is_reported() {
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };

        let result = raise_alert(&config(None, Some(99)), &event(7, None), &sink).await;

        match result {
            Err(AlertError::Delivery { channel_id, reason }) => {
                assert_eq!(channel_id, 99);
                assert!(reason.contains("Missing Permissions"));
            }
            other => panic!("expected delivery error, got {:?}", other),
        }
    }

    #[test]
    fn test_record_uses_placeholder_for_empty_message() {
        let record = format_alert_record(&event(7, Some("")));
        assert!(record.contains("Message: (no message provided)"));
        assert!(!record.contains("Legacy tag"));
    }

    #[test]
    fn test_record_includes_identity_details() {
        let mut alert = event(7, Some("hi"));
        alert.caller.discriminator = Some(7);

        let record = format_alert_record(&alert);

        assert!(record.contains("User (mention): <@1234>"));
        assert!(record.contains("Legacy tag: wren#0007"));
        assert!(record.contains("Display name: Wren the Brave"));
        assert!(record.contains("Channel: <#7>"));
        assert!(record.contains("<t:1714564800:F>"));
    }

    #[test]
    fn test_long_messages_are_truncated() {
        let long = "a".repeat(MAX_MESSAGE_CHARS + 50);
        let record = format_alert_record(&event(7, Some(&long)));
        assert!(record.chars().count() < 2000);
        assert!(record.ends_with('…'));
    }
}
