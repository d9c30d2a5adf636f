//! Seam between the engine and the chat platform.
//!
//! Services only talk to the platform through [`GuildPlatform`], which hands out
//! platform-independent snapshots and performs role mutations. The production implementation
//! wraps Serenity's HTTP client; tests use an in-memory mock that records every call.

pub mod discord;

#[cfg(test)]
pub mod mock;

use serenity::async_trait;

use crate::{
    error::AppError,
    model::guild::{GuildRole, GuildSnapshot},
};

/// Operations the engine needs from the chat platform.
#[async_trait]
pub trait GuildPlatform: Send + Sync {
    /// IDs of every guild the bot is a member of.
    async fn guild_ids(&self) -> Result<Vec<u64>, AppError>;

    /// Loads the guild's roles and full roster.
    ///
    /// A roster that could not be loaded completely is returned with `complete = false`
    /// instead of failing, so callers can decide whether partial data is usable.
    async fn snapshot(&self, guild_id: u64) -> Result<GuildSnapshot, AppError>;

    /// Loads the guild's roles without the roster.
    async fn roles(&self, guild_id: u64) -> Result<Vec<GuildRole>, AppError>;

    /// Grants a role to a member.
    async fn add_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
        reason: &str,
    ) -> Result<(), AppError>;

    /// Revokes a role from a member.
    async fn remove_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
        reason: &str,
    ) -> Result<(), AppError>;

    /// Posts an audit message.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the message belongs to
    /// - `channel_id` - Configured audit channel; when `None` the guild's first text channel
    ///   is used
    /// - `content` - Message text, already truncated to the platform limit
    async fn send_audit(
        &self,
        guild_id: u64,
        channel_id: Option<u64>,
        content: &str,
    ) -> Result<(), AppError>;
}
