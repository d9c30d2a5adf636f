use chrono::{DateTime, Utc};

use crate::{
    error::AppError,
    model::{
        grant::{BulkGrantReport, GrantOutcome},
        guild::{GuildRole, MemberSnapshot},
        history::HistoryEntry,
    },
    service::{audit::AuditLog, tenure::TenureService},
    state::AppState,
    util::time::to_unix,
};

/// Grants roles through the bot and records managed roles it did not grant itself.
pub struct GrantService<'a> {
    state: &'a AppState,
}

impl<'a> GrantService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Grants a role to a member and starts tracking it when it is managed.
    ///
    /// A member who already holds the role is left alone. Otherwise the role is granted
    /// first; for managed roles the retention override is then cleared and the assignment
    /// and a history entry are recorded if missing. Finally the tenure promoter runs for the
    /// granted role.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the member belongs to
    /// - `roles` - Roles defined in the guild
    /// - `member` - Member receiving the role
    /// - `role` - Role to grant
    /// - `reason` - Audit log reason sent with the platform call
    /// - `now` - Grant time
    ///
    /// # Returns
    /// - `Ok(GrantOutcome::AlreadyHeld)` - Nothing changed
    /// - `Ok(GrantOutcome::Granted)` - Role granted, with the retention that now applies
    /// - `Err(AppError)` - Platform call or store save failed
    pub async fn grant_with_timestamp(
        &self,
        guild_id: u64,
        roles: &[GuildRole],
        member: &MemberSnapshot,
        role: &GuildRole,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<GrantOutcome, AppError> {
        if member.holds(role.id) {
            return Ok(GrantOutcome::AlreadyHeld);
        }

        self.state
            .platform
            .add_role(guild_id, member.user_id, role.id, reason)
            .await?;

        let retention_seconds = {
            let mut store = self.state.store.lock().await;
            if store.is_managed(&role.name) {
                store.clear_retention_override(guild_id, member.user_id, &role.name);
                if store.insert_assignment(guild_id, member.user_id, &role.name, now) {
                    store.append_history(
                        guild_id,
                        member.user_id,
                        &role.name,
                        HistoryEntry::new(to_unix(now), ""),
                    );
                }
                store.save_all()?;
                Some(store.retention(guild_id, member.user_id, &role.name))
            } else {
                None
            }
        };

        let mut granted = member.clone();
        granted.role_ids.push(role.id);
        TenureService::new(self.state)
            .apply(guild_id, roles, &granted, role, now)
            .await;

        Ok(GrantOutcome::Granted { retention_seconds })
    }

    /// Starts tracking a managed role granted outside the bot.
    ///
    /// Already tracked assignments are left untouched, so repeated or replayed member
    /// updates keep their original time and any retention override.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the member belongs to
    /// - `member` - Member who received the role
    /// - `role_name` - Name of the received role
    /// - `now` - Time of observation
    ///
    /// # Returns
    /// - `Ok(true)` - A new assignment was recorded
    /// - `Ok(false)` - Role is not managed or already tracked
    /// - `Err(AppError)` - Store save failed
    pub async fn register_external_grant(
        &self,
        guild_id: u64,
        member: &MemberSnapshot,
        role_name: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        let mut store = self.state.store.lock().await;
        if !store.is_managed(role_name)
            || store.assigned_at(guild_id, member.user_id, role_name).is_some()
        {
            return Ok(false);
        }

        store.clear_retention_override(guild_id, member.user_id, role_name);
        store.insert_assignment(guild_id, member.user_id, role_name, now);
        store.append_history(
            guild_id,
            member.user_id,
            role_name,
            HistoryEntry::new(to_unix(now), ""),
        );
        store.save_all()?;

        tracing::info!(
            "Registered external grant of {} to {} in guild {}",
            role_name,
            member.display_name,
            guild_id
        );

        Ok(true)
    }

    /// Grants a role to every non-bot member lacking it.
    ///
    /// Calls are spaced by the member delay, with a longer pause every `batch_size` members.
    /// Individual failures are logged and skipped.
    ///
    /// # Arguments
    /// - `guild_id` - Guild to operate on
    /// - `role_id` - Role to grant
    /// - `actor` - Display name of the admin, used in reasons and the audit record
    /// - `now` - Grant time
    ///
    /// # Returns
    /// - `Ok(BulkGrantReport)` - Counts and the role's default retention when managed
    /// - `Err(AppError::NotFound)` - Role does not exist
    /// - `Err(AppError::BadRequest)` - Role is at or above the bot's highest role
    pub async fn bulk_grant(
        &self,
        guild_id: u64,
        role_id: u64,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<BulkGrantReport, AppError> {
        let snapshot = self.state.platform.snapshot(guild_id).await?;
        let role = snapshot
            .role_by_id(role_id)
            .ok_or_else(|| AppError::NotFound(format!("Role {} not found", role_id)))?;
        ensure_manageable(snapshot.bot_can_manage(role), role)?;

        if !snapshot.complete {
            tracing::warn!(
                "Roster of guild {} is incomplete, bulk grant covers loaded members only",
                guild_id
            );
        }

        let targets: Vec<&MemberSnapshot> = snapshot
            .humans()
            .filter(|member| !member.holds(role.id))
            .collect();
        let reason = format!("Bulk grant by {}", actor);
        let batch_size = self.state.config.batch_size.max(1);
        let mut granted = 0;

        for (position, member) in targets.iter().enumerate() {
            match self
                .grant_with_timestamp(guild_id, &snapshot.roles, member, role, &reason, now)
                .await
            {
                Ok(GrantOutcome::Granted { .. }) => granted += 1,
                Ok(GrantOutcome::AlreadyHeld) => {}
                Err(e) => tracing::error!(
                    "Bulk grant of {} to {} failed: {}",
                    role.name,
                    member.user_id,
                    e
                ),
            }

            if (position + 1) % batch_size == 0 {
                tracing::info!("Bulk grant of {}: {}/{}", role.name, position + 1, targets.len());
                tokio::time::sleep(self.state.config.api_delay).await;
            } else {
                tokio::time::sleep(self.state.config.member_delay).await;
            }
        }

        let retention_seconds = {
            let store = self.state.store.lock().await;
            store
                .is_managed(&role.name)
                .then(|| store.default_retention(&role.name))
        };

        AuditLog::new(self.state)
            .success(
                guild_id,
                &format!("{} bulk granted {} to {} members", actor, role.name, granted),
            )
            .await;

        Ok(BulkGrantReport {
            role_name: role.name.clone(),
            targeted: targets.len(),
            granted,
            retention_seconds,
        })
    }

    /// Grants a role to a single member, typically the admin testing a setup.
    ///
    /// # Returns
    /// - `Ok(GrantOutcome)` - Already held, or granted with the applicable retention
    /// - `Err(AppError::NotFound)` - Role or member does not exist
    /// - `Err(AppError::BadRequest)` - Role is at or above the bot's highest role
    pub async fn test_grant(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
        now: DateTime<Utc>,
    ) -> Result<GrantOutcome, AppError> {
        let snapshot = self.state.platform.snapshot(guild_id).await?;
        let role = snapshot
            .role_by_id(role_id)
            .ok_or_else(|| AppError::NotFound(format!("Role {} not found", role_id)))?;
        ensure_manageable(snapshot.bot_can_manage(role), role)?;

        let member = snapshot
            .member(user_id)
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", user_id)))?;

        self.grant_with_timestamp(guild_id, &snapshot.roles, member, role, "Test grant", now)
            .await
    }
}

fn ensure_manageable(manageable: bool, role: &GuildRole) -> Result<(), AppError> {
    if manageable {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Cannot grant {}: it is not below the bot's highest role",
            role.name
        )))
    }
}
