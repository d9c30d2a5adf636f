use serde::{Deserialize, Serialize};

/// Tenure applied when a rule is created without an explicit value.
pub const DEFAULT_TENURE_DAYS: u32 = 90;

fn default_tenure_days() -> u32 {
    DEFAULT_TENURE_DAYS
}

/// Promotion rule attached to a one-shot trigger role.
///
/// When a member is granted the trigger role and has been in the guild for at least
/// `tenure_days`, they receive `target_role`. The trigger role is removed either way.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenureRule {
    /// Role granted to members with enough tenure.
    pub target_role: String,
    /// Minimum whole days since joining, at least 1.
    #[serde(default = "default_tenure_days")]
    pub tenure_days: u32,
}

/// A rule together with the trigger role it is keyed by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenureRuleEntry {
    pub trigger_role: String,
    pub rule: TenureRule,
}

/// What the promoter did for one trigger grant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TenureOutcome {
    /// Whether a rule matched the trigger role.
    pub rule_matched: bool,
    /// Whether the target role was granted.
    pub granted: bool,
    /// Whether the trigger role was removed.
    pub trigger_removed: bool,
}
