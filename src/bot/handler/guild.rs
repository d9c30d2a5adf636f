//! Guild event handler.
//!
//! `guild_create` fires on bot startup for each guild the bot is already in, when the bot
//! joins a new guild, and when a guild becomes available again after an outage. Each of
//! these starts a startup reconciliation and expiry sweep for that guild.

use serenity::all::Guild;

use crate::model::event::RoleEvent;

/// Translates a guild becoming available.
///
/// # Arguments
/// - `guild` - Guild payload from the gateway
///
/// # Returns
/// - `RoleEvent::GuildAvailable` - Event for the worker
pub fn handle_guild_create(guild: &Guild) -> RoleEvent {
    tracing::info!("Guild {} ({}) is available", guild.name, guild.id);

    RoleEvent::GuildAvailable {
        guild_id: guild.id.get(),
    }
}
