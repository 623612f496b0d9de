// Discord commands module.
// Each feature gets its own command file.

pub mod alert;

pub mod info;

pub mod settings;

pub mod invocation;

// Bot presence management
pub mod presence;

use crate::discord::{Data, Error};

/// Every slash command Angel registers.
pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        alert::angel(),
        info::angel_info(),
        settings::angel_setup(),
        settings::angel_set_intake(),
        settings::angel_clear_intake(),
        settings::angel_set_logs(),
        settings::angel_set_manager(),
    ]
}
