//! Error types for the bot.
//!
//! This module provides the application's error hierarchy. The `AppError` enum serves as the
//! top-level error type that wraps domain-specific errors. Scheduled jobs and event handlers
//! log errors instead of propagating them; admin operations return the `BadRequest` and
//! `NotFound` variants so a command surface can show the message to the caller.

pub mod config;
pub mod store;

use thiserror::Error;

use crate::error::{config::ConfigError, store::StoreError};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the application. Most variants use
/// `#[from]` for automatic error conversion.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Persistent store failure (I/O, malformed JSON, failed validation, backups).
    #[error(transparent)]
    StoreErr(#[from] StoreError),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size. Permission errors, role hierarchy violations and members
    /// that left the guild all surface here.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Cron scheduler error.
    #[error(transparent)]
    SchedulerErr(#[from] tokio_cron_scheduler::JobSchedulerError),

    /// Resource not found error.
    ///
    /// # Fields
    /// - Message describing what resource was not found
    #[error("{0}")]
    NotFound(String),

    /// Invalid admin input. No state was changed.
    ///
    /// # Fields
    /// - Message describing what was invalid about the request
    #[error("{0}")]
    BadRequest(String),

    /// Internal error with custom message.
    ///
    /// # Fields
    /// - Detailed error message for logging
    #[error("{0}")]
    InternalError(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
