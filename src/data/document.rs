//! Typed shapes of the persisted JSON documents.
//!
//! Each document is a nested map keyed by guild ID, then user ID or role name. IDs are
//! written as decimal strings because JSON object keys must be strings. Every document
//! validates its contents after deserialization so a structurally valid but semantically
//! broken file is rejected at the load boundary.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{
    error::store::StoreError,
    model::{backup::DocumentKind, history::HistoryEntry, tenure::TenureRule},
    util::time::from_unix,
};

/// guild -> user -> role -> assigned at (unix seconds)
pub type AssignmentMap = BTreeMap<u64, BTreeMap<u64, BTreeMap<String, f64>>>;

/// guild -> user -> role -> retention override in seconds
pub type OverrideMap = BTreeMap<u64, BTreeMap<u64, BTreeMap<String, i64>>>;

/// guild -> user -> role -> entries in insertion order
pub type HistoryMap = BTreeMap<u64, BTreeMap<u64, BTreeMap<String, Vec<HistoryEntry>>>>;

/// A persisted document with a fixed kind and structural validation.
pub trait Document: Serialize + DeserializeOwned + Default {
    /// Which file this document lives in.
    const KIND: DocumentKind;

    /// Checks invariants that the type system cannot express.
    ///
    /// # Returns
    /// - `Ok(())` - Document can be trusted
    /// - `Err(StoreError::Invalid)` - First violated invariant
    fn validate(&self) -> Result<(), StoreError>;
}

fn invalid(kind: DocumentKind, reason: String) -> StoreError {
    StoreError::Invalid {
        document: kind.name(),
        reason,
    }
}

fn validate_timestamp(
    kind: DocumentKind,
    value: f64,
    at: impl FnOnce() -> String,
) -> Result<(), StoreError> {
    if value >= 0.0 && from_unix(value).is_some() {
        Ok(())
    } else {
        Err(invalid(kind, format!("timestamp {} at {} is not a valid time", value, at())))
    }
}

/// Tracked managed role assignments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssignmentDocument(pub AssignmentMap);

impl Document for AssignmentDocument {
    const KIND: DocumentKind = DocumentKind::RoleAssignments;

    fn validate(&self) -> Result<(), StoreError> {
        for (guild_id, users) in &self.0 {
            for (user_id, roles) in users {
                for (role_name, assigned_at) in roles {
                    if role_name.trim().is_empty() {
                        return Err(invalid(
                            Self::KIND,
                            format!("empty role name for user {} in guild {}", user_id, guild_id),
                        ));
                    }
                    validate_timestamp(Self::KIND, *assigned_at, || {
                        format!("{}/{}/{}", guild_id, user_id, role_name)
                    })?;
                }
            }
        }
        Ok(())
    }
}

/// Per-role default retention and per-member overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsDocument {
    /// role -> default retention in seconds
    #[serde(default)]
    pub remove_seconds: BTreeMap<String, i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub user_remove_seconds: OverrideMap,
}

impl Document for SettingsDocument {
    const KIND: DocumentKind = DocumentKind::Settings;

    fn validate(&self) -> Result<(), StoreError> {
        for (role_name, seconds) in &self.remove_seconds {
            if *seconds < 0 {
                return Err(invalid(
                    Self::KIND,
                    format!("negative default retention {} for role '{}'", seconds, role_name),
                ));
            }
        }
        for (guild_id, users) in &self.user_remove_seconds {
            for (user_id, roles) in users {
                for (role_name, seconds) in roles {
                    if *seconds < 0 {
                        return Err(invalid(
                            Self::KIND,
                            format!(
                                "negative retention override {} at {}/{}/{}",
                                seconds, guild_id, user_id, role_name
                            ),
                        ));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Append-only grant history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryDocument(pub HistoryMap);

impl Document for HistoryDocument {
    const KIND: DocumentKind = DocumentKind::RoleHistory;

    fn validate(&self) -> Result<(), StoreError> {
        for (guild_id, users) in &self.0 {
            for (user_id, roles) in users {
                for (role_name, entries) in roles {
                    for (index, entry) in entries.iter().enumerate() {
                        validate_timestamp(Self::KIND, entry.timestamp, || {
                            format!("{}/{}/{}[{}]", guild_id, user_id, role_name, index)
                        })?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Audit channel per guild.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogChannelDocument(pub BTreeMap<u64, u64>);

impl Document for LogChannelDocument {
    const KIND: DocumentKind = DocumentKind::LogChannels;

    fn validate(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Tenure promotion rules per guild, keyed by trigger role name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenureRuleDocument(pub BTreeMap<u64, BTreeMap<String, TenureRule>>);

impl Document for TenureRuleDocument {
    const KIND: DocumentKind = DocumentKind::TenureRules;

    fn validate(&self) -> Result<(), StoreError> {
        for (guild_id, rules) in &self.0 {
            for (trigger, rule) in rules {
                if rule.target_role.trim().is_empty() {
                    return Err(invalid(
                        Self::KIND,
                        format!("rule '{}' in guild {} has no target role", trigger, guild_id),
                    ));
                }
                if rule.tenure_days < 1 {
                    return Err(invalid(
                        Self::KIND,
                        format!("rule '{}' in guild {} requires at least 1 day", trigger, guild_id),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Parses and validates a document from its JSON text.
///
/// # Arguments
/// - `path` - Source path, used in error messages
/// - `content` - Raw file content
///
/// # Returns
/// - `Ok(D)` - Parsed and validated document
/// - `Err(StoreError::Json)` - Content is not valid JSON of the expected shape
/// - `Err(StoreError::Invalid)` - Content failed validation
pub fn parse_document<D: Document>(
    path: &std::path::Path,
    content: &str,
) -> Result<D, StoreError> {
    let document: D = serde_json::from_str(content).map_err(|e| StoreError::json(path, e))?;
    document.validate()?;
    Ok(document)
}

/// Checks that `content` is a valid document of the given kind without keeping it.
pub fn validate_content(
    kind: DocumentKind,
    path: &std::path::Path,
    content: &str,
) -> Result<(), StoreError> {
    match kind {
        DocumentKind::RoleAssignments => {
            parse_document::<AssignmentDocument>(path, content).map(drop)
        }
        DocumentKind::Settings => parse_document::<SettingsDocument>(path, content).map(drop),
        DocumentKind::RoleHistory => parse_document::<HistoryDocument>(path, content).map(drop),
        DocumentKind::LogChannels => parse_document::<LogChannelDocument>(path, content).map(drop),
        DocumentKind::TenureRules => parse_document::<TenureRuleDocument>(path, content).map(drop),
    }
}
