use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

use crate::{
    error::AppError,
    model::{
        guild::GuildSnapshot,
        history::HistoryEntry,
        sync::{SyncChanges, SyncKind},
    },
    service::{audit::AuditLog, tenure::TenureService},
    state::AppState,
    util::time::to_unix,
};

/// Brings stored assignments in line with the roles members actually hold.
pub struct ReconcileService<'a> {
    state: &'a AppState,
}

impl<'a> ReconcileService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Reconciles one guild against its live snapshot.
    ///
    /// Live (member, managed role) pairs missing from the store are recorded with
    /// `assigned_at = now`, appended to history and have any retention override cleared.
    /// Stored pairs no longer held are dropped; history is kept. The assignment document is
    /// re-read from disk and validated first, and an incomplete roster makes the pass a
    /// no-op. Afterwards every member still holding a trigger role is run through the tenure
    /// promoter.
    ///
    /// # Arguments
    /// - `snapshot` - Live guild state
    /// - `kind` - What started the pass, used in the audit record
    /// - `now` - Current time
    ///
    /// # Returns
    /// - `Ok(SyncChanges)` - Counts of added and removed assignments
    /// - `Err(AppError::StoreErr)` - Stored assignments could not be reloaded or saved
    pub async fn reconcile(
        &self,
        snapshot: &GuildSnapshot,
        kind: SyncKind,
        now: DateTime<Utc>,
    ) -> Result<SyncChanges, AppError> {
        let guild_id = snapshot.guild_id;

        if !snapshot.complete || snapshot.members.is_empty() {
            tracing::warn!(
                "Roster of guild {} ({}) is incomplete, skipping {} sync",
                snapshot.name,
                guild_id,
                kind
            );
            return Ok(SyncChanges::default());
        }

        let changes = {
            let _guard = self.state.guild_locks.lock(guild_id).await;
            let mut store = self.state.store.lock().await;
            store.reload_assignments()?;

            let mut live: BTreeMap<u64, BTreeSet<&str>> = BTreeMap::new();
            for member in snapshot.humans() {
                let held: BTreeSet<&str> = snapshot
                    .role_names_of(member)
                    .into_iter()
                    .filter(|name| store.is_managed(name))
                    .collect();
                if !held.is_empty() {
                    live.insert(member.user_id, held);
                }
            }

            let mut changes = SyncChanges::default();

            for assignment in store.guild_assignments(guild_id) {
                let still_held = live
                    .get(&assignment.user_id)
                    .is_some_and(|roles| roles.contains(assignment.role_name.as_str()));
                if !still_held
                    && store.remove_assignment(guild_id, assignment.user_id, &assignment.role_name)
                {
                    changes.removed += 1;
                }
            }

            for (user_id, roles) in &live {
                for role_name in roles {
                    if store.insert_assignment(guild_id, *user_id, role_name, now) {
                        store.clear_retention_override(guild_id, *user_id, role_name);
                        store.append_history(
                            guild_id,
                            *user_id,
                            role_name,
                            HistoryEntry::new(to_unix(now), ""),
                        );
                        changes.added += 1;
                    }
                }
            }

            if !changes.is_empty() {
                store.save_all()?;
            }

            changes
        };

        if !changes.is_empty() {
            AuditLog::new(self.state)
                .info(
                    guild_id,
                    &format!(
                        "{} sync: removed {}, added {}",
                        kind,
                        changes.removed,
                        changes.added
                    ),
                )
                .await;
        }

        self.catch_up_tenure(snapshot, now).await;

        Ok(changes)
    }

    /// Runs the tenure promoter for every member still holding a trigger role.
    async fn catch_up_tenure(&self, snapshot: &GuildSnapshot, now: DateTime<Utc>) {
        let rules = self.state.store.lock().await.tenure_rules(snapshot.guild_id);
        if rules.is_empty() {
            return;
        }

        let tenure = TenureService::new(self.state);
        for entry in &rules {
            let Some(trigger) = snapshot.role_by_name(&entry.trigger_role) else {
                continue;
            };

            for member in snapshot.humans().filter(|member| member.holds(trigger.id)) {
                tenure
                    .apply(snapshot.guild_id, &snapshot.roles, member, trigger, now)
                    .await;
            }
        }
    }
}
