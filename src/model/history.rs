use serde::{Deserialize, Serialize};

/// Maximum length of a history reason, in characters.
pub const MAX_REASON_CHARS: usize = 500;

/// Number of entries shown per role on one history page.
pub const ENTRIES_PER_PAGE: usize = 5;

/// One recorded grant of a managed role.
///
/// Entries are append-only; only `reason` may be edited afterwards. Older data files stored
/// bare timestamps, which are read as entries with an empty reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawHistoryEntry")]
pub struct HistoryEntry {
    /// Unix seconds of the grant.
    pub timestamp: f64,
    /// Free-text reason, empty when none was given.
    pub reason: String,
}

impl HistoryEntry {
    pub fn new(timestamp: f64, reason: impl Into<String>) -> Self {
        Self {
            timestamp,
            reason: reason.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawHistoryEntry {
    Legacy(f64),
    Entry {
        timestamp: f64,
        #[serde(default)]
        reason: String,
    },
}

impl From<RawHistoryEntry> for HistoryEntry {
    fn from(raw: RawHistoryEntry) -> Self {
        match raw {
            RawHistoryEntry::Legacy(timestamp) => Self::new(timestamp, String::new()),
            RawHistoryEntry::Entry { timestamp, reason } => Self { timestamp, reason },
        }
    }
}

/// A history entry together with its position in the stored list.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedEntry {
    /// Zero-based insertion index, used to address the entry when editing its reason.
    pub index: usize,
    pub entry: HistoryEntry,
}

/// One role's slice of a history page.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleHistoryPage {
    pub role_name: String,
    /// Total entries recorded for this role.
    pub total: usize,
    /// Entries on this page, newest first.
    pub entries: Vec<IndexedEntry>,
}

/// A page of a member's role history across all managed roles.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPage {
    /// Zero-based page number, clamped to the available range.
    pub page: usize,
    /// Number of pages; the largest page count of any role.
    pub total_pages: usize,
    /// Roles that have at least one entry, in configured order.
    pub roles: Vec<RoleHistoryPage>,
}

impl HistoryPage {
    /// Whether the member has no recorded history at all.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
