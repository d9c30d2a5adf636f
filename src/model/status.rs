use std::time::Duration;

/// Snapshot of the bot's configuration and tracking state for one guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    /// Members with at least one tracked managed role.
    pub tracked_users: usize,
    pub check_interval: Duration,
    pub sync_interval: Duration,
    /// Configured audit channel, if any.
    pub log_channel_id: Option<u64>,
    pub debug: bool,
    /// Managed roles with their default retention, in configured order.
    pub retention_defaults: Vec<(String, i64)>,
}
