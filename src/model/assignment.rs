use chrono::{DateTime, Utc};

/// A managed role currently held by a member, with the time it was first observed.
///
/// Only auto-managed roles produce assignments. The assignment exists while the member
/// holds the role (as of the last reconciliation) and is removed on expiry, reconciliation
/// or when the member leaves.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleAssignment {
    /// Discord guild ID.
    pub guild_id: u64,
    /// Discord user ID.
    pub user_id: u64,
    /// Managed role name.
    pub role_name: String,
    /// When the role was granted or first observed.
    pub assigned_at: DateTime<Utc>,
}

impl RoleAssignment {
    /// Seconds left before the assignment expires.
    ///
    /// # Arguments
    /// - `retention_seconds` - Effective retention (override or role default)
    /// - `now` - Current time
    ///
    /// # Returns
    /// - `i64` - Remaining seconds; zero or negative means the role is due for removal
    pub fn remaining_seconds(&self, retention_seconds: i64, now: DateTime<Utc>) -> i64 {
        let elapsed = (now - self.assigned_at).num_seconds();
        retention_seconds - elapsed
    }
}

/// How an admin adjusts the remaining time of a member's managed role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionAction {
    /// Extend the remaining time by the given amount.
    Add,
    /// Shorten the remaining time by the given amount, not below zero.
    Subtract,
    /// Replace the remaining time with the given amount.
    Set,
}

impl std::str::FromStr for RetentionAction {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "add" => Ok(Self::Add),
            "sub" => Ok(Self::Subtract),
            "set" => Ok(Self::Set),
            other => Err(format!("Unknown retention action '{}'", other)),
        }
    }
}

/// Result of adjusting a member's retention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetentionAdjustment {
    /// A per-user override now yields `new_remaining` seconds.
    Updated {
        previous_remaining: i64,
        new_remaining: i64,
    },
    /// The remaining time dropped to zero, so the override was removed and the role default
    /// applies again.
    ResetToDefault { previous_remaining: i64 },
}

/// Remaining time for one managed role of a member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemainingTime {
    /// Member does not hold the role.
    NotAssigned,
    /// Role will be removed after this many seconds.
    Remaining(i64),
    /// Role is due and will be removed by the next sweep.
    Due,
}

/// Remaining time report for a single member.
#[derive(Debug, Clone, PartialEq)]
pub struct RemainingTimeReport {
    pub user_id: u64,
    /// One entry per managed role, in configured order.
    pub roles: Vec<(String, RemainingTime)>,
}
