use std::{fmt, str::FromStr};

/// The five persisted documents.
///
/// Each kind owns a live file in the data directory and a file name prefix in the backup
/// directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    RoleAssignments,
    Settings,
    RoleHistory,
    LogChannels,
    TenureRules,
}

impl DocumentKind {
    /// All kinds, in save order.
    pub const ALL: [DocumentKind; 5] = [
        DocumentKind::RoleAssignments,
        DocumentKind::Settings,
        DocumentKind::RoleHistory,
        DocumentKind::LogChannels,
        DocumentKind::TenureRules,
    ];

    /// Live file name inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::RoleAssignments => "roles_data.json",
            Self::Settings => "bot_settings.json",
            Self::RoleHistory => "role_add_history.json",
            Self::LogChannels => "log_channel_settings.json",
            Self::TenureRules => "tenure_role_rules.json",
        }
    }

    /// Name used by admins and as the backup file prefix.
    pub fn name(self) -> &'static str {
        match self {
            Self::RoleAssignments => "roles_data",
            Self::Settings => "settings",
            Self::RoleHistory => "role_history",
            Self::LogChannels => "log_channel",
            Self::TenureRules => "tenure_rules",
        }
    }

    /// Backup file name for a `YYYYMMDD_HHMMSS` stamp.
    pub fn backup_file_name(self, stamp: &str) -> String {
        format!("{}_{}.json", self.name(), stamp)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DocumentKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == value)
            .ok_or_else(|| format!("Unknown data type '{}'", value))
    }
}

/// Files involved in a completed restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreReport {
    pub kind: DocumentKind,
    /// Backup that was copied over the live file.
    pub restored_from: String,
    /// Snapshot of the live file taken before the copy, if it existed.
    pub pre_restore_backup: Option<String>,
    /// Snapshot of the live file taken after the copy.
    pub post_restore_backup: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_kind_by_name() {
        for kind in DocumentKind::ALL {
            assert_eq!(kind.name().parse::<DocumentKind>(), Ok(kind));
        }
        assert!("roles".parse::<DocumentKind>().is_err());
    }

    #[test]
    fn composes_backup_file_names() {
        assert_eq!(
            DocumentKind::TenureRules.backup_file_name("20250101_120000"),
            "tenure_rules_20250101_120000.json"
        );
    }
}
