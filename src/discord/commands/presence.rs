// Bot presence, set once the gateway connection is ready.

use poise::serenity_prelude as serenity;

/// Show members how to reach Angel.
pub fn on_ready(ctx: &serenity::Context) {
    let activity = serenity::ActivityData::watching("for /angel");
    ctx.set_presence(Some(activity), serenity::OnlineStatus::Online);
}
