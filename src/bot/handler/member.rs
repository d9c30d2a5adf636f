use chrono::DateTime;
use serenity::all::{GuildMemberUpdateEvent, Member};

use crate::model::{event::RoleEvent, guild::MemberSnapshot};

/// Translates a member update into the roles the member gained.
///
/// Without a cached previous state every role the member holds counts as added; the
/// grant service ignores managed roles that are already tracked.
///
/// # Arguments
/// - `old` - Cached member state before the update, if any
/// - `new` - Cached member state after the update, if any
/// - `event` - Raw update payload, used when the cache has no member
///
/// # Returns
/// - `Some(RoleEvent::MemberRolesAdded)` - Member gained at least one role
/// - `None` - No role was added or the member is a bot
pub fn handle_guild_member_update(
    old: Option<&Member>,
    new: Option<&Member>,
    event: &GuildMemberUpdateEvent,
) -> Option<RoleEvent> {
    let member = match new {
        Some(member) => MemberSnapshot::from_member(member),
        None => snapshot_from_event(event),
    };

    if member.is_bot {
        return None;
    }

    let added_role_ids = added_roles(old, &member.role_ids);
    if added_role_ids.is_empty() {
        return None;
    }

    tracing::debug!(
        "Member {} gained {} roles in guild {}",
        member.user_id,
        added_role_ids.len(),
        event.guild_id
    );

    Some(RoleEvent::MemberRolesAdded {
        guild_id: event.guild_id.get(),
        member,
        added_role_ids,
    })
}

/// Role IDs held now that were not held before.
fn added_roles(old: Option<&Member>, current: &[u64]) -> Vec<u64> {
    match old {
        Some(old) => current
            .iter()
            .copied()
            .filter(|id| !old.roles.iter().any(|role| role.get() == *id))
            .collect(),
        None => current.to_vec(),
    }
}

fn snapshot_from_event(event: &GuildMemberUpdateEvent) -> MemberSnapshot {
    let display_name = event
        .nick
        .clone()
        .or_else(|| event.user.global_name.clone())
        .unwrap_or_else(|| event.user.name.clone());

    MemberSnapshot {
        user_id: event.user.id.get(),
        display_name,
        is_bot: event.user.bot,
        role_ids: event.roles.iter().map(|role| role.get()).collect(),
        joined_at: DateTime::from_timestamp(event.joined_at.unix_timestamp(), 0),
    }
}
