/// Result of granting a role to every member lacking it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkGrantReport {
    pub role_name: String,
    /// Non-bot members that lacked the role when the run started.
    pub targeted: usize,
    /// Members the role was granted to.
    pub granted: usize,
    /// Default retention of the role, when it is a managed role.
    pub retention_seconds: Option<i64>,
}

/// Result of granting a role to a single member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantOutcome {
    /// The member already held the role; nothing was changed.
    AlreadyHeld,
    /// The role was granted. Managed roles carry the retention that now applies.
    Granted { retention_seconds: Option<i64> },
}
