//! Platform-independent views of a guild, its roles and its members.
//!
//! Services decide everything from these snapshots. The Serenity platform builds them from
//! REST responses; tests build them directly.

use chrono::{DateTime, Utc};
use serenity::all::{Member, Role};

/// A role defined in a guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuildRole {
    /// Discord role ID.
    pub id: u64,
    /// Role name. Store documents and tenure rules refer to roles by name.
    pub name: String,
    /// Hierarchy position (higher = more important).
    pub position: u16,
}

impl GuildRole {
    /// Converts a Serenity role at the platform boundary.
    pub fn from_role(role: &Role) -> Self {
        Self {
            id: role.id.get(),
            name: role.name.clone(),
            position: role.position,
        }
    }
}

/// A guild member as seen by the bot.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSnapshot {
    /// Discord user ID.
    pub user_id: u64,
    /// Nickname, global name or username, in that order of preference.
    pub display_name: String,
    /// Bot accounts are never tracked.
    pub is_bot: bool,
    /// IDs of the roles the member holds.
    pub role_ids: Vec<u64>,
    /// When the member joined the guild, if known.
    pub joined_at: Option<DateTime<Utc>>,
}

impl MemberSnapshot {
    /// Converts a Serenity member at the platform boundary.
    ///
    /// # Arguments
    /// - `member` - Member from a gateway event or a REST roster page
    ///
    /// # Returns
    /// - `MemberSnapshot` - Snapshot with role IDs and join time (second precision)
    pub fn from_member(member: &Member) -> Self {
        Self {
            user_id: member.user.id.get(),
            display_name: member.display_name().to_string(),
            is_bot: member.user.bot,
            role_ids: member.roles.iter().map(|role| role.get()).collect(),
            joined_at: member
                .joined_at
                .and_then(|ts| DateTime::from_timestamp(ts.unix_timestamp(), 0)),
        }
    }

    /// Whether the member holds the role with the given ID.
    pub fn holds(&self, role_id: u64) -> bool {
        self.role_ids.contains(&role_id)
    }

    /// Whole days since the member joined; 0 when the join time is unknown.
    ///
    /// # Arguments
    /// - `now` - Current time
    ///
    /// # Returns
    /// - `i64` - `floor((now - joined_at) / 1 day)`, never negative
    pub fn tenure_days(&self, now: DateTime<Utc>) -> i64 {
        self.joined_at
            .map(|joined| (now - joined).num_days().max(0))
            .unwrap_or(0)
    }
}

/// Live view of a guild's roles and roster.
#[derive(Debug, Clone, PartialEq)]
pub struct GuildSnapshot {
    /// Discord guild ID.
    pub guild_id: u64,
    /// Guild name, used in log lines.
    pub name: String,
    /// False when the roster could not be fully loaded. Consumers that delete state based on
    /// absence must not act on an incomplete roster.
    pub complete: bool,
    /// All roles defined in the guild.
    pub roles: Vec<GuildRole>,
    /// All members, bots included.
    pub members: Vec<MemberSnapshot>,
    /// The bot's own user ID, if known.
    pub bot_user_id: Option<u64>,
}

impl GuildSnapshot {
    /// Finds a role by name.
    pub fn role_by_name(&self, name: &str) -> Option<&GuildRole> {
        find_role_by_name(&self.roles, name)
    }

    /// Finds a role by ID.
    pub fn role_by_id(&self, role_id: u64) -> Option<&GuildRole> {
        self.roles.iter().find(|role| role.id == role_id)
    }

    /// Finds a member by user ID.
    pub fn member(&self, user_id: u64) -> Option<&MemberSnapshot> {
        self.members.iter().find(|member| member.user_id == user_id)
    }

    /// Names of the roles a member holds, skipping IDs unknown to the guild.
    pub fn role_names_of<'a>(&'a self, member: &MemberSnapshot) -> Vec<&'a str> {
        member
            .role_ids
            .iter()
            .filter_map(|id| self.role_by_id(*id))
            .map(|role| role.name.as_str())
            .collect()
    }

    /// Position of the bot's highest role, or 0 when the bot has none or is unknown.
    ///
    /// The bot can only grant or revoke roles strictly below this position.
    pub fn bot_top_position(&self) -> u16 {
        self.bot_user_id
            .and_then(|bot_id| self.member(bot_id))
            .map(|bot| {
                bot.role_ids
                    .iter()
                    .filter_map(|id| self.role_by_id(*id))
                    .map(|role| role.position)
                    .max()
                    .unwrap_or(0)
            })
            .unwrap_or(0)
    }

    /// Whether the bot is allowed to manage `role` under the role hierarchy.
    pub fn bot_can_manage(&self, role: &GuildRole) -> bool {
        role.position < self.bot_top_position()
    }

    /// Non-bot members.
    pub fn humans(&self) -> impl Iterator<Item = &MemberSnapshot> {
        self.members.iter().filter(|member| !member.is_bot)
    }
}

/// Finds a role by name in a role list.
pub fn find_role_by_name<'a>(roles: &'a [GuildRole], name: &str) -> Option<&'a GuildRole> {
    roles.iter().find(|role| role.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use test_utils::serenity::{create_test_member, create_test_role};

    /// Tests converting a Serenity member into a snapshot.
    ///
    /// Verifies that IDs, bot flag, role IDs and join time survive the conversion.
    ///
    /// Expected: Ok with all fields mapped
    #[test]
    fn converts_serenity_member() {
        let member = create_test_member(
            1,
            42,
            "alice",
            &[111, 222],
            Some("2024-01-01T00:00:00.000000+00:00"),
            false,
        );

        let snapshot = MemberSnapshot::from_member(&member);

        assert_eq!(snapshot.user_id, 42);
        assert_eq!(snapshot.display_name, "alice");
        assert!(!snapshot.is_bot);
        assert_eq!(snapshot.role_ids, vec![111, 222]);
        assert_eq!(
            snapshot.joined_at,
            DateTime::from_timestamp(1_704_067_200, 0)
        );
    }

    /// Tests converting a Serenity role into a guild role.
    ///
    /// Expected: Ok with id, name and position mapped
    #[test]
    fn converts_serenity_role() {
        let role = create_test_role(1, 111, "Warning", 4);

        let converted = GuildRole::from_role(&role);

        assert_eq!(
            converted,
            GuildRole {
                id: 111,
                name: "Warning".to_string(),
                position: 4,
            }
        );
    }

    /// Tests tenure day computation.
    ///
    /// Verifies flooring to whole days and the zero fallback for unknown join time.
    ///
    /// Expected: Ok with 89 days one second before the 90-day boundary
    #[test]
    fn computes_tenure_days() {
        let now = DateTime::from_timestamp(1_800_000_000, 0).unwrap();
        let mut member = MemberSnapshot {
            user_id: 1,
            display_name: "bob".to_string(),
            is_bot: false,
            role_ids: vec![],
            joined_at: Some(now - Duration::days(90) + Duration::seconds(1)),
        };
        assert_eq!(member.tenure_days(now), 89);

        member.joined_at = Some(now - Duration::days(90));
        assert_eq!(member.tenure_days(now), 90);

        member.joined_at = None;
        assert_eq!(member.tenure_days(now), 0);
    }

    /// Tests the role hierarchy check.
    ///
    /// Expected: Ok with roles below the bot's top role manageable and others not
    #[test]
    fn checks_bot_hierarchy() {
        let roles = vec![
            GuildRole { id: 1, name: "bot".to_string(), position: 5 },
            GuildRole { id: 2, name: "Warning".to_string(), position: 2 },
            GuildRole { id: 3, name: "Admin".to_string(), position: 9 },
        ];
        let snapshot = GuildSnapshot {
            guild_id: 10,
            name: "guild".to_string(),
            complete: true,
            roles: roles.clone(),
            members: vec![MemberSnapshot {
                user_id: 99,
                display_name: "rolekeeper".to_string(),
                is_bot: true,
                role_ids: vec![1],
                joined_at: None,
            }],
            bot_user_id: Some(99),
        };

        assert_eq!(snapshot.bot_top_position(), 5);
        assert!(snapshot.bot_can_manage(&roles[1]));
        assert!(!snapshot.bot_can_manage(&roles[0]));
        assert!(!snapshot.bot_can_manage(&roles[2]));
    }
}
