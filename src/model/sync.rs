use std::fmt;

/// Which trigger started a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncKind {
    /// Guild became available after connect or reconnect.
    Startup,
    /// Scheduled reconciliation.
    Periodic,
    /// Admin-requested reconciliation.
    Manual,
}

impl fmt::Display for SyncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Startup => "startup",
            Self::Periodic => "periodic",
            Self::Manual => "manual",
        })
    }
}

/// Counts of assignments changed by one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncChanges {
    /// Live (member, role) pairs that were missing from the store.
    pub added: usize,
    /// Stored pairs that were no longer held live.
    pub removed: usize,
}

impl SyncChanges {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Result of an admin-requested reconciliation followed by an expiry sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForceSyncReport {
    pub changes: SyncChanges,
    /// Roles revoked by the expiry sweep.
    pub expired: usize,
}
