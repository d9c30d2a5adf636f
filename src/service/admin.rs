use chrono::{DateTime, Utc};

use crate::{
    error::AppError,
    model::{
        backup::{DocumentKind, RestoreReport},
        status::StatusReport,
        sync::{ForceSyncReport, SyncKind},
        tenure::{TenureRule, TenureRuleEntry},
    },
    service::{audit::AuditLog, expiry::ExpiryService, reconcile::ReconcileService},
    state::AppState,
    util::time::is_backup_stamp,
};

/// Guild configuration and maintenance operations for admins.
pub struct AdminService<'a> {
    state: &'a AppState,
}

impl<'a> AdminService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Reports configuration and tracking state for a guild.
    pub async fn status(&self, guild_id: u64) -> StatusReport {
        let store = self.state.store.lock().await;
        let config = &self.state.config;

        StatusReport {
            tracked_users: store.tracked_user_count(guild_id),
            check_interval: config.check_interval,
            sync_interval: config.sync_interval,
            log_channel_id: store.log_channel(guild_id),
            debug: config.debug,
            retention_defaults: store
                .managed_roles()
                .iter()
                .map(|role| (role.clone(), store.default_retention(role)))
                .collect(),
        }
    }

    /// Sends the guild's audit records to `channel_id`.
    ///
    /// # Returns
    /// - `Ok(Option<u64>)` - Previously configured channel
    /// - `Err(AppError)` - Store save failed
    pub async fn set_log_channel(
        &self,
        guild_id: u64,
        channel_id: u64,
    ) -> Result<Option<u64>, AppError> {
        let previous = {
            let mut store = self.state.store.lock().await;
            let previous = store.set_log_channel(guild_id, channel_id);
            store.save_all()?;
            previous
        };

        AuditLog::new(self.state)
            .info(guild_id, &format!("Audit log channel set to {}", channel_id))
            .await;

        Ok(previous)
    }

    /// Creates or replaces the tenure rule of a trigger role.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the rule applies to
    /// - `trigger_role` - Role whose grant triggers the check
    /// - `target_role` - Role granted when tenure is met
    /// - `tenure_days` - Required whole days since joining, at least 1
    ///
    /// # Returns
    /// - `Ok(Option<TenureRule>)` - Rule previously attached to the trigger role
    /// - `Err(AppError::BadRequest)` - Days below 1, blank role names, or trigger equals target
    pub async fn set_tenure_rule(
        &self,
        guild_id: u64,
        trigger_role: &str,
        target_role: &str,
        tenure_days: u32,
    ) -> Result<Option<TenureRule>, AppError> {
        if tenure_days < 1 {
            return Err(AppError::BadRequest("Tenure must be at least 1 day".to_string()));
        }
        if trigger_role.trim().is_empty() || target_role.trim().is_empty() {
            return Err(AppError::BadRequest("Role names must not be empty".to_string()));
        }
        if trigger_role == target_role {
            return Err(AppError::BadRequest(
                "Trigger and target role must differ".to_string(),
            ));
        }

        let previous = {
            let mut store = self.state.store.lock().await;
            let previous = store.set_tenure_rule(
                guild_id,
                trigger_role,
                TenureRule {
                    target_role: target_role.to_string(),
                    tenure_days,
                },
            );
            store.save_all()?;
            previous
        };

        AuditLog::new(self.state)
            .info(
                guild_id,
                &format!(
                    "Tenure rule set: {} -> {} after {} days",
                    trigger_role, target_role, tenure_days
                ),
            )
            .await;

        Ok(previous)
    }

    /// Lists the guild's tenure rules ordered by trigger role.
    pub async fn tenure_rules(&self, guild_id: u64) -> Vec<TenureRuleEntry> {
        self.state.store.lock().await.tenure_rules(guild_id)
    }

    /// Deletes the tenure rule of a trigger role.
    ///
    /// # Returns
    /// - `Ok(TenureRule)` - The deleted rule
    /// - `Err(AppError::NotFound)` - No rule for that trigger role
    pub async fn delete_tenure_rule(
        &self,
        guild_id: u64,
        trigger_role: &str,
    ) -> Result<TenureRule, AppError> {
        let removed = {
            let mut store = self.state.store.lock().await;
            let removed = store
                .delete_tenure_rule(guild_id, trigger_role)
                .ok_or_else(|| {
                    AppError::NotFound(format!("No tenure rule for '{}'", trigger_role))
                })?;
            store.save_all()?;
            removed
        };

        AuditLog::new(self.state)
            .info(guild_id, &format!("Tenure rule for '{}' deleted", trigger_role))
            .await;

        Ok(removed)
    }

    /// Reconciles the guild, then runs an expiry sweep.
    ///
    /// # Returns
    /// - `Ok(ForceSyncReport)` - Reconciliation changes and the number of expired roles
    /// - `Err(AppError)` - Snapshot, reload or save failed
    pub async fn force_sync(
        &self,
        guild_id: u64,
        now: DateTime<Utc>,
    ) -> Result<ForceSyncReport, AppError> {
        let snapshot = self.state.platform.snapshot(guild_id).await?;
        let changes = ReconcileService::new(self.state)
            .reconcile(&snapshot, SyncKind::Manual, now)
            .await?;
        let expired = ExpiryService::new(self.state).sweep(guild_id, now).await?;

        Ok(ForceSyncReport { changes, expired })
    }

    /// Lists backup generation stamps of a document kind, newest first.
    pub async fn list_backups(&self, kind: DocumentKind) -> Result<Vec<String>, AppError> {
        let store = self.state.store.lock().await;
        Ok(store.backups().list(kind)?)
    }

    /// Restores a document from a backup generation and reloads the store.
    ///
    /// # Arguments
    /// - `guild_id` - Guild receiving the audit record
    /// - `kind` - Document to restore
    /// - `stamp` - Generation stamp in `YYYYMMDD_HHMMSS` form
    /// - `now` - Time used for the pre and post restore snapshots
    ///
    /// # Returns
    /// - `Ok(RestoreReport)` - Restored generation and snapshot names
    /// - `Err(AppError::BadRequest)` - Malformed stamp
    /// - `Err(AppError::StoreErr)` - Missing or invalid generation, or copy failure
    pub async fn restore_backup(
        &self,
        guild_id: u64,
        kind: DocumentKind,
        stamp: &str,
        now: DateTime<Utc>,
    ) -> Result<RestoreReport, AppError> {
        if !is_backup_stamp(stamp) {
            return Err(AppError::BadRequest(
                "Timestamp must use the YYYYMMDD_HHMMSS format".to_string(),
            ));
        }

        let report = self.state.store.lock().await.restore(kind, stamp, now)?;

        AuditLog::new(self.state)
            .info(
                guild_id,
                &format!("Restored {} from {}", kind, report.restored_from),
            )
            .await;

        Ok(report)
    }
}
