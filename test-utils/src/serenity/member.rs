//! Test factory for creating Serenity Member objects.
//!
//! Members are what the bot receives from `guild_member_update` events and from paginated
//! roster fetches. The factory deserializes JSON shaped like Discord's guild member
//! payload.

use serenity::all::Member;

/// Creates a test Serenity Member.
///
/// # Arguments
/// - `guild_id` - Guild the member belongs to
/// - `user_id` - User snowflake
/// - `username` - Username, also used as the global display name
/// - `role_ids` - Role snowflakes the member holds
/// - `joined_at` - Optional RFC 3339 join timestamp
/// - `bot` - Whether the user is a bot account
///
/// # Returns
/// - `Member` - A valid Serenity Member struct for testing
///
/// # Panics
/// - If the JSON cannot be deserialized into a Member (indicates invalid test data)
pub fn create_test_member(
    guild_id: u64,
    user_id: u64,
    username: &str,
    role_ids: &[u64],
    joined_at: Option<&str>,
    bot: bool,
) -> Member {
    let roles: Vec<String> = role_ids.iter().map(|id| id.to_string()).collect();

    serde_json::from_value(serde_json::json!({
        "guild_id": guild_id.to_string(),
        "user": {
            "id": user_id.to_string(),
            "username": username,
            "global_name": username,
            "discriminator": "0",
            "avatar": null,
            "bot": bot,
        },
        "nick": null,
        "avatar": null,
        "roles": roles,
        "joined_at": joined_at,
        "premium_since": null,
        "deaf": false,
        "mute": false,
        "flags": 0,
        "pending": false,
        "communication_disabled_until": null,
    }))
    .expect("Failed to create test member - invalid JSON structure")
}
