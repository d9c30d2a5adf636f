use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use crate::{
    data::{
        backup::BackupManager,
        document::{
            parse_document, validate_content, AssignmentDocument, Document, HistoryDocument,
            LogChannelDocument, SettingsDocument, TenureRuleDocument,
        },
    },
    error::store::StoreError,
    model::{
        assignment::RoleAssignment,
        backup::{DocumentKind, RestoreReport},
        history::HistoryEntry,
        tenure::{TenureRule, TenureRuleEntry},
    },
    util::time::{from_unix, to_unix},
};

/// Settings needed to open a store.
pub struct StoreConfig {
    /// Directory holding the five live documents.
    pub data_dir: PathBuf,
    /// Auto-managed role names, in configured order.
    pub managed_roles: Vec<String>,
    /// Retention used for a managed role without a stored default.
    pub default_retention_seconds: i64,
    pub backups: BackupManager,
}

/// In-memory copy of the persisted documents.
///
/// Documents are loaded wholesale and rewritten wholesale by [`RoleStore::save_all`].
/// Mutating methods only touch memory; callers persist once per logical operation.
pub struct RoleStore {
    data_dir: PathBuf,
    managed_roles: Vec<String>,
    default_retention_seconds: i64,
    backups: BackupManager,

    assignments: AssignmentDocument,
    settings: SettingsDocument,
    history: HistoryDocument,
    log_channels: LogChannelDocument,
    tenure_rules: TenureRuleDocument,
}

impl RoleStore {
    /// Opens the store, creating missing documents with defaults.
    ///
    /// # Arguments
    /// - `config` - Data directory, managed roles and backup settings
    ///
    /// # Returns
    /// - `Ok(RoleStore)` - All documents loaded and validated
    /// - `Err(StoreError)` - A document could not be read, parsed or validated. Existing
    ///   files are never overwritten in that case.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&config.data_dir)
            .map_err(|e| StoreError::io(&config.data_dir, e))?;

        let mut store = Self {
            data_dir: config.data_dir,
            managed_roles: config.managed_roles,
            default_retention_seconds: config.default_retention_seconds,
            backups: config.backups,
            assignments: AssignmentDocument::default(),
            settings: SettingsDocument::default(),
            history: HistoryDocument::default(),
            log_channels: LogChannelDocument::default(),
            tenure_rules: TenureRuleDocument::default(),
        };
        store.load_all()?;

        Ok(store)
    }

    /// Reloads every document from disk.
    ///
    /// All documents are parsed before any in-memory state is replaced, so a failure leaves
    /// the store as it was.
    pub fn load_all(&mut self) -> Result<(), StoreError> {
        let assignments = self.load_or_create(AssignmentDocument::default)?;
        let settings = self.load_or_create(|| self.default_settings())?;
        let history = self.load_or_create(HistoryDocument::default)?;
        let log_channels = self.load_or_create(LogChannelDocument::default)?;
        let tenure_rules = self.load_or_create(TenureRuleDocument::default)?;

        self.assignments = assignments;
        self.settings = settings;
        self.history = history;
        self.log_channels = log_channels;
        self.tenure_rules = tenure_rules;
        self.ensure_retention_defaults();

        tracing::debug!("Loaded documents from {}", self.data_dir.display());

        Ok(())
    }

    /// Re-reads the assignment document from disk and validates it.
    ///
    /// Reconciliation calls this before trusting stored state. On failure the in-memory
    /// assignments are left unchanged.
    pub fn reload_assignments(&mut self) -> Result<(), StoreError> {
        self.assignments = self.load_or_create(AssignmentDocument::default)?;
        Ok(())
    }

    /// Writes every document whose content differs from the file on disk.
    ///
    /// When anything changed, all existing live files are first copied into a new backup
    /// generation. A failed backup is logged and does not prevent the write.
    ///
    /// # Returns
    /// - `Ok(true)` - At least one document was rewritten
    /// - `Ok(false)` - Disk already matched memory
    /// - `Err(StoreError)` - Serialization or write failure
    pub fn save_all(&mut self) -> Result<bool, StoreError> {
        let pending = [
            (DocumentKind::RoleAssignments, to_value(&self.assignments)?),
            (DocumentKind::Settings, to_value(&self.settings)?),
            (DocumentKind::RoleHistory, to_value(&self.history)?),
            (DocumentKind::LogChannels, to_value(&self.log_channels)?),
            (DocumentKind::TenureRules, to_value(&self.tenure_rules)?),
        ];

        let changed: Vec<&(DocumentKind, Value)> = pending
            .iter()
            .filter(|(kind, value)| read_value(&self.path(*kind)).as_ref() != Some(value))
            .collect();

        if changed.is_empty() {
            return Ok(false);
        }

        if let Err(e) = self.backups.snapshot_all(&self.data_dir, Utc::now()) {
            tracing::error!("Failed to back up documents before saving: {}", e);
        }

        for (kind, value) in changed {
            write_value(&self.path(*kind), value)?;
        }

        Ok(true)
    }

    /// Replaces a live document with a backup generation.
    ///
    /// The backup content is validated before anything is touched. The live file is
    /// snapshotted before and after the copy (outside rotation), then every document is
    /// reloaded from disk.
    ///
    /// # Arguments
    /// - `kind` - Document to restore
    /// - `stamp` - `YYYYMMDD_HHMMSS` stamp of the generation
    /// - `now` - Time used for the snapshot stamps
    ///
    /// # Returns
    /// - `Ok(RestoreReport)` - Restored file and snapshot names
    /// - `Err(StoreError::BackupNotFound)` - No such generation
    /// - `Err(StoreError::Json | Invalid)` - Backup content is not a valid document
    /// - `Err(StoreError::Io)` - Copy failed
    pub fn restore(
        &mut self,
        kind: DocumentKind,
        stamp: &str,
        now: DateTime<Utc>,
    ) -> Result<RestoreReport, StoreError> {
        let backup_path = self.backups.generation_path(kind, stamp)?;
        let content = std::fs::read_to_string(&backup_path)
            .map_err(|e| StoreError::io(&backup_path, e))?;
        validate_content(kind, &backup_path, &content)?;

        let live_path = self.path(kind);
        let pre_restore_backup = self.backups.snapshot_labeled(kind, &live_path, "pre", now)?;

        std::fs::copy(&backup_path, &live_path).map_err(|e| StoreError::io(&live_path, e))?;

        let post_restore_backup =
            self.backups
                .snapshot_labeled(kind, &live_path, "restored", now)?;

        self.load_all()?;

        Ok(RestoreReport {
            kind,
            restored_from: kind.backup_file_name(stamp),
            pre_restore_backup,
            post_restore_backup,
        })
    }

    pub fn backups(&self) -> &BackupManager {
        &self.backups
    }

    /// Managed role names in configured order.
    pub fn managed_roles(&self) -> &[String] {
        &self.managed_roles
    }

    pub fn is_managed(&self, role_name: &str) -> bool {
        self.managed_roles.iter().any(|role| role == role_name)
    }

    // Assignments

    /// When the member was assigned the managed role, if tracked.
    pub fn assigned_at(
        &self,
        guild_id: u64,
        user_id: u64,
        role_name: &str,
    ) -> Option<DateTime<Utc>> {
        self.assignments
            .0
            .get(&guild_id)
            .and_then(|users| users.get(&user_id))
            .and_then(|roles| roles.get(role_name))
            .and_then(|seconds| from_unix(*seconds))
    }

    /// All tracked assignments of a guild, ordered by user ID then role name.
    pub fn guild_assignments(&self, guild_id: u64) -> Vec<RoleAssignment> {
        let Some(users) = self.assignments.0.get(&guild_id) else {
            return Vec::new();
        };

        users
            .iter()
            .flat_map(|(user_id, roles)| {
                roles.iter().filter_map(move |(role_name, seconds)| {
                    from_unix(*seconds).map(|assigned_at| RoleAssignment {
                        guild_id,
                        user_id: *user_id,
                        role_name: role_name.clone(),
                        assigned_at,
                    })
                })
            })
            .collect()
    }

    /// Members of a guild with at least one tracked assignment.
    pub fn tracked_user_count(&self, guild_id: u64) -> usize {
        self.assignments
            .0
            .get(&guild_id)
            .map(|users| users.values().filter(|roles| !roles.is_empty()).count())
            .unwrap_or(0)
    }

    /// Records an assignment unless one is already tracked.
    ///
    /// # Returns
    /// - `true` - Assignment was inserted
    /// - `false` - Assignment already existed and was left unchanged
    pub fn insert_assignment(
        &mut self,
        guild_id: u64,
        user_id: u64,
        role_name: &str,
        assigned_at: DateTime<Utc>,
    ) -> bool {
        let roles = self
            .assignments
            .0
            .entry(guild_id)
            .or_default()
            .entry(user_id)
            .or_default();

        if roles.contains_key(role_name) {
            return false;
        }
        roles.insert(role_name.to_string(), to_unix(assigned_at));
        true
    }

    /// Drops an assignment. History is untouched.
    ///
    /// # Returns
    /// - `true` - Assignment existed and was removed
    pub fn remove_assignment(&mut self, guild_id: u64, user_id: u64, role_name: &str) -> bool {
        let Some(users) = self.assignments.0.get_mut(&guild_id) else {
            return false;
        };
        let Some(roles) = users.get_mut(&user_id) else {
            return false;
        };

        let removed = roles.remove(role_name).is_some();
        if roles.is_empty() {
            users.remove(&user_id);
        }
        if users.is_empty() {
            self.assignments.0.remove(&guild_id);
        }
        removed
    }

    /// Drops every assignment of a member.
    ///
    /// # Returns
    /// - `usize` - Number of assignments removed
    pub fn remove_user_assignments(&mut self, guild_id: u64, user_id: u64) -> usize {
        let Some(users) = self.assignments.0.get_mut(&guild_id) else {
            return 0;
        };

        let removed = users.remove(&user_id).map(|roles| roles.len()).unwrap_or(0);
        if users.is_empty() {
            self.assignments.0.remove(&guild_id);
        }
        removed
    }

    // Retention

    /// Default retention of a role.
    pub fn default_retention(&self, role_name: &str) -> i64 {
        self.settings
            .remove_seconds
            .get(role_name)
            .copied()
            .unwrap_or(self.default_retention_seconds)
    }

    pub fn set_default_retention(&mut self, role_name: &str, seconds: i64) {
        self.settings
            .remove_seconds
            .insert(role_name.to_string(), seconds);
    }

    pub fn retention_override(&self, guild_id: u64, user_id: u64, role_name: &str) -> Option<i64> {
        self.settings
            .user_remove_seconds
            .get(&guild_id)
            .and_then(|users| users.get(&user_id))
            .and_then(|roles| roles.get(role_name))
            .copied()
    }

    /// Effective retention: the member's override, else the role default.
    pub fn retention(&self, guild_id: u64, user_id: u64, role_name: &str) -> i64 {
        self.retention_override(guild_id, user_id, role_name)
            .unwrap_or_else(|| self.default_retention(role_name))
    }

    /// Sets a member's retention override. Zero or less clears it.
    pub fn set_retention_override(
        &mut self,
        guild_id: u64,
        user_id: u64,
        role_name: &str,
        seconds: i64,
    ) {
        if seconds <= 0 {
            self.clear_retention_override(guild_id, user_id, role_name);
            return;
        }

        self.settings
            .user_remove_seconds
            .entry(guild_id)
            .or_default()
            .entry(user_id)
            .or_default()
            .insert(role_name.to_string(), seconds);
    }

    /// Removes a member's retention override, pruning empty maps.
    ///
    /// # Returns
    /// - `true` - An override existed and was removed
    pub fn clear_retention_override(
        &mut self,
        guild_id: u64,
        user_id: u64,
        role_name: &str,
    ) -> bool {
        let overrides = &mut self.settings.user_remove_seconds;
        let Some(users) = overrides.get_mut(&guild_id) else {
            return false;
        };
        let Some(roles) = users.get_mut(&user_id) else {
            return false;
        };

        let removed = roles.remove(role_name).is_some();
        if roles.is_empty() {
            users.remove(&user_id);
        }
        if users.is_empty() {
            overrides.remove(&guild_id);
        }
        removed
    }

    // History

    /// Appends a history entry. Only managed roles are recorded.
    ///
    /// # Returns
    /// - `true` - Entry was appended
    /// - `false` - Role is not managed
    pub fn append_history(
        &mut self,
        guild_id: u64,
        user_id: u64,
        role_name: &str,
        entry: HistoryEntry,
    ) -> bool {
        if !self.is_managed(role_name) {
            return false;
        }

        self.history
            .0
            .entry(guild_id)
            .or_default()
            .entry(user_id)
            .or_default()
            .entry(role_name.to_string())
            .or_default()
            .push(entry);
        true
    }

    /// Recorded entries for one role of a member, in insertion order.
    pub fn role_history(&self, guild_id: u64, user_id: u64, role_name: &str) -> &[HistoryEntry] {
        self.history
            .0
            .get(&guild_id)
            .and_then(|users| users.get(&user_id))
            .and_then(|roles| roles.get(role_name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replaces the reason of the entry at `index`.
    ///
    /// # Returns
    /// - `Some(String)` - Previous reason
    /// - `None` - No entry at that index; nothing changed
    pub fn edit_history_reason(
        &mut self,
        guild_id: u64,
        user_id: u64,
        role_name: &str,
        index: usize,
        reason: String,
    ) -> Option<String> {
        let entry = self
            .history
            .0
            .get_mut(&guild_id)?
            .get_mut(&user_id)?
            .get_mut(role_name)?
            .get_mut(index)?;

        Some(std::mem::replace(&mut entry.reason, reason))
    }

    // Log channels

    pub fn log_channel(&self, guild_id: u64) -> Option<u64> {
        self.log_channels.0.get(&guild_id).copied()
    }

    /// Sets the audit channel of a guild, returning the previous one.
    pub fn set_log_channel(&mut self, guild_id: u64, channel_id: u64) -> Option<u64> {
        self.log_channels.0.insert(guild_id, channel_id)
    }

    // Tenure rules

    pub fn tenure_rule(&self, guild_id: u64, trigger_role: &str) -> Option<&TenureRule> {
        self.tenure_rules
            .0
            .get(&guild_id)
            .and_then(|rules| rules.get(trigger_role))
    }

    /// All rules of a guild, ordered by trigger role name.
    pub fn tenure_rules(&self, guild_id: u64) -> Vec<TenureRuleEntry> {
        self.tenure_rules
            .0
            .get(&guild_id)
            .map(|rules| {
                rules
                    .iter()
                    .map(|(trigger_role, rule)| TenureRuleEntry {
                        trigger_role: trigger_role.clone(),
                        rule: rule.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Creates or replaces a rule, returning the previous one.
    pub fn set_tenure_rule(
        &mut self,
        guild_id: u64,
        trigger_role: &str,
        rule: TenureRule,
    ) -> Option<TenureRule> {
        self.tenure_rules
            .0
            .entry(guild_id)
            .or_default()
            .insert(trigger_role.to_string(), rule)
    }

    /// Deletes a rule, returning it if it existed.
    pub fn delete_tenure_rule(&mut self, guild_id: u64, trigger_role: &str) -> Option<TenureRule> {
        let rules = self.tenure_rules.0.get_mut(&guild_id)?;
        let removed = rules.remove(trigger_role);
        if rules.is_empty() {
            self.tenure_rules.0.remove(&guild_id);
        }
        removed
    }

    fn path(&self, kind: DocumentKind) -> PathBuf {
        self.data_dir.join(kind.file_name())
    }

    fn default_settings(&self) -> SettingsDocument {
        SettingsDocument {
            remove_seconds: self
                .managed_roles
                .iter()
                .map(|role| (role.clone(), self.default_retention_seconds))
                .collect::<BTreeMap<_, _>>(),
            user_remove_seconds: BTreeMap::new(),
        }
    }

    fn ensure_retention_defaults(&mut self) {
        for role in &self.managed_roles {
            self.settings
                .remove_seconds
                .entry(role.clone())
                .or_insert(self.default_retention_seconds);
        }
    }

    /// Loads a document, writing `default` first when the file does not exist.
    fn load_or_create<D: Document>(&self, default: impl FnOnce() -> D) -> Result<D, StoreError> {
        let path = self.path(D::KIND);

        if !path.exists() {
            let document = default();
            write_value(&path, &to_value(&document)?)?;
            tracing::info!("Created {} with defaults", path.display());
            return Ok(document);
        }

        let content = std::fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        parse_document(&path, &content)
    }
}

fn to_value<T: Serialize>(document: &T) -> Result<Value, StoreError> {
    serde_json::to_value(document).map_err(|e| StoreError::Invalid {
        document: "in-memory",
        reason: e.to_string(),
    })
}

/// Reads a file as untyped JSON; `None` when it is missing or unreadable.
fn read_value(path: &Path) -> Option<Value> {
    let content = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

/// Replaces a file with pretty-printed JSON through a temporary sibling.
fn write_value(path: &Path, value: &Value) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(value).map_err(|e| StoreError::json(path, e))?;
    let tmp = path.with_extension("json.tmp");

    std::fs::write(&tmp, content).map_err(|e| StoreError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))
}
