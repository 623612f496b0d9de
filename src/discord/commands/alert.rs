// The `/angel` panic button.
//
// 1. Capture who asked, from where, and what they said
// 2. Let the core decide whether and where to deliver
// 3. Tell the caller, privately, what happened

use super::invocation::{reply_private, GENERIC_FAILURE, NOT_IN_GUILD};
use crate::core::alerts::{raise_alert, AlertCaller, AlertError, AlertEvent, AlertReceipt};
use crate::discord::alert_sink::ChannelAlertSink;
use crate::discord::{Context, Error};

const CONFIRMATION: &str =
    "Your request has been quietly sent to the moderators. Someone will reach out soon.";
const NOT_CONFIGURED: &str = "Angel isn't fully set up on this server yet, so your request \
     could not be delivered. Please contact a moderator directly.";

/// Quietly request help from trusted moderators.
#[poise::command(slash_command)]
pub async fn angel(
    ctx: Context<'_>,
    #[description = "Optional context about what you need help with."] message: Option<String>,
) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        return reply_private(ctx, NOT_IN_GUILD).await;
    };

    // Delivery can take longer than the interaction deadline.
    ctx.defer_ephemeral().await?;

    let config = ctx.data().settings.get_config(guild_id.get()).await;
    let event = AlertEvent {
        caller: capture_caller(ctx).await,
        guild_id: guild_id.get(),
        source_channel_id: ctx.channel_id().get(),
        message,
        raised_at: chrono::Utc::now(),
    };

    let sink = ChannelAlertSink::new(ctx.http());
    let outcome = raise_alert(&config, &event, &sink).await;
    if let Err(err @ AlertError::Delivery { .. }) = &outcome {
        tracing::error!(
            guild_id = guild_id.get(),
            user_id = event.caller.user_id,
            error = %err,
            "Alert could not be delivered"
        );
    }

    reply_private(ctx, alert_reply(&outcome)).await
}

/// The private answer the caller gets for each outcome.
fn alert_reply(outcome: &Result<AlertReceipt, AlertError>) -> String {
    match outcome {
        Ok(_) => CONFIRMATION.to_string(),
        Err(AlertError::NotConfigured) => NOT_CONFIGURED.to_string(),
        Err(AlertError::WrongChannel { intake_channel_id }) => format!(
            "This isn't the right place to use /angel. Use it in <#{}>.",
            intake_channel_id
        ),
        Err(AlertError::Delivery { .. }) => GENERIC_FAILURE.to_string(),
    }
}

async fn capture_caller(ctx: Context<'_>) -> AlertCaller {
    let user = ctx.author();
    let display_name = match ctx.author_member().await {
        Some(member) => member.display_name().to_string(),
        None => user.display_name().to_string(),
    };

    AlertCaller {
        user_id: user.id.get(),
        username: user.name.clone(),
        discriminator: user.discriminator.map(|d| d.get()),
        display_name,
    }
}
