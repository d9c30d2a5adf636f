//! Discord gateway integration.
//!
//! The gateway connection only translates events. Handlers convert Serenity payloads into
//! [`RoleEvent`](crate::model::event::RoleEvent)s and push them onto the event queue; the
//! event worker does the actual reconciliation and promotion work.
//!
//! # Gateway Intents
//!
//! The bot requires the following gateway intents:
//! - `GUILDS` - Receive events about guilds becoming available
//! - `GUILD_MEMBERS` - Receive member updates with role changes (privileged intent)
//!
//! Note: `GUILD_MEMBERS` is a privileged intent and must be explicitly enabled
//! in the Discord Developer Portal for the bot application.

pub mod handler;
pub mod start;
