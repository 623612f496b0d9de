// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "guild_config/mod.rs"]
pub mod guild_config;

#[path = "alerts/mod.rs"]
pub mod alerts;
