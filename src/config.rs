use chrono::FixedOffset;
use std::{path::PathBuf, str::FromStr, time::Duration};

use crate::error::{config::ConfigError, AppError};

const DEFAULT_AUTO_REMOVE_ROLES: &str = "Caution,Warning";
const DEFAULT_RETENTION_SECONDS: i64 = 90 * 86_400;
const DEBUG_RETENTION_SECONDS: i64 = 15;

pub struct Config {
    pub discord_bot_token: String,

    pub data_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub backup_keep_generations: usize,

    /// Roles whose assignments are tracked and expire after their retention period.
    pub managed_roles: Vec<String>,
    /// Retention applied to a managed role that has no configured default yet.
    pub default_retention_seconds: i64,

    pub check_interval: Duration,
    pub sync_interval: Duration,

    pub batch_size: usize,
    /// Pause at batch checkpoints and between guilds.
    pub api_delay: Duration,
    /// Pause between consecutive role mutations.
    pub member_delay: Duration,

    /// Offset used for human-readable timestamps and backup file names.
    pub display_offset: FixedOffset,

    pub debug: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let debug = optional_env("DEBUG")
            .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let (check_default, sync_default, batch_default, api_delay_default, retention_default) =
            if debug {
                (10, 15, 20, 500, DEBUG_RETENTION_SECONDS)
            } else {
                (600, 3600, 50, 200, DEFAULT_RETENTION_SECONDS)
            };

        let managed_roles = parse_role_list(
            &optional_env("AUTO_REMOVE_ROLES")
                .unwrap_or_else(|| DEFAULT_AUTO_REMOVE_ROLES.to_string()),
        );

        let offset_hours: i32 = parse_env("DISPLAY_UTC_OFFSET_HOURS", 9)?;
        let display_offset = FixedOffset::east_opt(offset_hours * 3600).ok_or_else(|| {
            ConfigError::InvalidEnvVar {
                name: "DISPLAY_UTC_OFFSET_HOURS".to_string(),
                value: offset_hours.to_string(),
                reason: "offset must be between -23 and 23 hours".to_string(),
            }
        })?;

        Ok(Self {
            discord_bot_token: std::env::var("DISCORD_BOT_TOKEN")
                .map_err(|_| ConfigError::MissingEnvVar("DISCORD_BOT_TOKEN".to_string()))?,
            data_dir: optional_env("DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            backup_dir: optional_env("BACKUP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("backup")),
            backup_keep_generations: parse_env("BACKUP_KEEP_GENERATIONS", 20)?,
            managed_roles,
            default_retention_seconds: parse_env("DEFAULT_RETENTION_SECONDS", retention_default)?,
            check_interval: Duration::from_secs(parse_env(
                "CHECK_INTERVAL_SECONDS",
                check_default,
            )?),
            sync_interval: Duration::from_secs(parse_env("SYNC_INTERVAL_SECONDS", sync_default)?),
            batch_size: parse_env("BATCH_SIZE", batch_default)?,
            api_delay: Duration::from_millis(parse_env("API_DELAY_MS", api_delay_default)?),
            member_delay: Duration::from_millis(parse_env("MEMBER_DELAY_MS", 100)?),
            display_offset,
            debug,
        })
    }
}

/// Reads an environment variable, treating an empty value as unset.
fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.trim().is_empty())
}

/// Reads and parses an environment variable, falling back to `default` when unset.
fn parse_env<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional_env(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                name: name.to_string(),
                value: value.clone(),
                reason: e.to_string(),
            }),
    }
}

/// Splits a comma separated role list, dropping blanks and duplicates.
fn parse_role_list(value: &str) -> Vec<String> {
    let mut roles: Vec<String> = Vec::new();
    for role in value.split(',').map(str::trim).filter(|r| !r.is_empty()) {
        if !roles.iter().any(|existing| existing == role) {
            roles.push(role.to_string());
        }
    }
    roles
}
