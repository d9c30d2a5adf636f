use serde_json::{json, Value};

/// File name of the role assignment document.
pub const ROLES_DATA_FILE: &str = "roles_data.json";
/// File name of the settings document.
pub const SETTINGS_FILE: &str = "bot_settings.json";
/// File name of the role history document.
pub const ROLE_HISTORY_FILE: &str = "role_add_history.json";
/// File name of the log channel document.
pub const LOG_CHANNEL_FILE: &str = "log_channel_settings.json";
/// File name of the tenure rule document.
pub const TENURE_RULES_FILE: &str = "tenure_role_rules.json";

/// Creates a role assignment document holding a single assignment.
///
/// # Arguments
/// - `guild_id` - Guild snowflake
/// - `user_id` - User snowflake
/// - `role_name` - Managed role name
/// - `assigned_at` - Unix timestamp in seconds
///
/// # Returns
/// - `Value` - `{guild: {user: {role: assigned_at}}}`
pub fn assignments(guild_id: u64, user_id: u64, role_name: &str, assigned_at: f64) -> Value {
    json!({
        guild_id.to_string(): {
            user_id.to_string(): {
                role_name: assigned_at
            }
        }
    })
}

/// Creates a settings document with one default retention and optional override.
///
/// # Arguments
/// - `role_name` - Managed role name
/// - `default_seconds` - Default retention for the role
/// - `user_override` - Optional `(guild_id, user_id, seconds)` override
///
/// # Returns
/// - `Value` - Settings document
pub fn settings(
    role_name: &str,
    default_seconds: i64,
    user_override: Option<(u64, u64, i64)>,
) -> Value {
    let mut doc = json!({
        "remove_seconds": {
            role_name: default_seconds
        }
    });

    if let Some((guild_id, user_id, seconds)) = user_override {
        doc["user_remove_seconds"] = json!({
            guild_id.to_string(): {
                user_id.to_string(): {
                    role_name: seconds
                }
            }
        });
    }

    doc
}

/// Creates a history document using the current `{timestamp, reason}` entry format.
///
/// # Arguments
/// - `guild_id` - Guild snowflake
/// - `user_id` - User snowflake
/// - `role_name` - Managed role name
/// - `entries` - `(timestamp, reason)` pairs in insertion order
///
/// # Returns
/// - `Value` - History document
pub fn history(guild_id: u64, user_id: u64, role_name: &str, entries: &[(f64, &str)]) -> Value {
    let entries: Vec<Value> = entries
        .iter()
        .map(|(timestamp, reason)| json!({ "timestamp": timestamp, "reason": reason }))
        .collect();

    json!({
        guild_id.to_string(): {
            user_id.to_string(): {
                role_name: entries
            }
        }
    })
}

/// Creates a history document using the legacy bare-timestamp format.
///
/// # Arguments
/// - `guild_id` - Guild snowflake
/// - `user_id` - User snowflake
/// - `role_name` - Managed role name
/// - `timestamps` - Timestamps in insertion order
///
/// # Returns
/// - `Value` - History document with `[f64, ...]` lists
pub fn legacy_history(guild_id: u64, user_id: u64, role_name: &str, timestamps: &[f64]) -> Value {
    json!({
        guild_id.to_string(): {
            user_id.to_string(): {
                role_name: timestamps
            }
        }
    })
}

/// Creates a log channel document mapping one guild.
pub fn log_channel(guild_id: u64, channel_id: u64) -> Value {
    json!({ guild_id.to_string(): channel_id })
}

/// Creates a tenure rule document with a single rule.
///
/// # Arguments
/// - `guild_id` - Guild snowflake
/// - `trigger_role` - Trigger role name
/// - `target_role` - Role granted when tenure is met
/// - `tenure_days` - Required days since joining
///
/// # Returns
/// - `Value` - Tenure rule document
pub fn tenure_rule(
    guild_id: u64,
    trigger_role: &str,
    target_role: &str,
    tenure_days: u32,
) -> Value {
    json!({
        guild_id.to_string(): {
            trigger_role: {
                "target_role": target_role,
                "tenure_days": tenure_days
            }
        }
    })
}
