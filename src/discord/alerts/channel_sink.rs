use crate::core::alerts::AlertSink;
use async_trait::async_trait;
use poise::serenity_prelude as serenity;

/// Posts alert records to a guild text channel.
pub struct ChannelAlertSink<'a> {
    http: &'a serenity::Http,
}

impl<'a> ChannelAlertSink<'a> {
    pub fn new(http: &'a serenity::Http) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AlertSink for ChannelAlertSink<'_> {
    async fn deliver(&self, channel_id: u64, record: &str) -> anyhow::Result<()> {
        // The record mentions the caller; moderators should see it without
        // anyone being pinged.
        let message = serenity::CreateMessage::new()
            .content(record)
            .allowed_mentions(serenity::CreateAllowedMentions::new());

        serenity::ChannelId::new(channel_id)
            .send_message(self.http, message)
            .await?;
        Ok(())
    }
}
