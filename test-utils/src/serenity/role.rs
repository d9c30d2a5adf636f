//! Test factory for creating Serenity Role objects.

use serenity::all::Role;

/// Creates a test Serenity Role.
///
/// Only the fields the bot reads are configurable: roles are resolved by name and the
/// hierarchy check compares positions. Everything else is a plain, unmanaged role.
///
/// # Arguments
/// - `guild_id` - Guild the role belongs to
/// - `role_id` - Role snowflake
/// - `name` - Role name
/// - `position` - Hierarchy position (higher = more important)
///
/// # Returns
/// - `Role` - A valid Serenity Role struct for testing
///
/// # Panics
/// - If the JSON cannot be deserialized into a Role (indicates invalid test data)
pub fn create_test_role(guild_id: u64, role_id: u64, name: &str, position: u16) -> Role {
    serde_json::from_value(serde_json::json!({
        "id": role_id.to_string(),
        "guild_id": guild_id.to_string(),
        "name": name,
        "color": 0,
        "hoist": false,
        "icon": null,
        "unicode_emoji": null,
        "position": position,
        "permissions": "0",
        "managed": false,
        "mentionable": false,
        "flags": 0,
    }))
    .expect("Failed to create test role - invalid JSON structure")
}
