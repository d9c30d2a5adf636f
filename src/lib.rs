//! Role moderation engine for Discord guilds.
//!
//! Tracks when auto-managed roles were granted, revokes them once their retention has
//! elapsed, keeps stored assignments in line with live rosters, and promotes members by
//! tenure. The services in [`service`] are the administrative API; [`bot`] and
//! [`scheduler`] drive them from gateway events and timers.

pub mod bot;
pub mod config;
pub mod data;
pub mod error;
pub mod model;
pub mod platform;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;

#[cfg(test)]
mod testing;
