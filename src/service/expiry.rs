use chrono::{DateTime, Utc};

use crate::{
    error::AppError,
    model::assignment::RoleAssignment,
    service::audit::AuditLog,
    state::AppState,
    util::{duration::format_duration, time::display},
};

/// An assignment whose retention has run out.
struct DueRemoval {
    assignment: RoleAssignment,
    role_id: u64,
    display_name: String,
    retention_seconds: i64,
}

/// Revokes managed roles whose retention has elapsed.
pub struct ExpiryService<'a> {
    state: &'a AppState,
}

impl<'a> ExpiryService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Runs one expiry sweep over a guild.
    ///
    /// Every stored assignment is checked against the live roster. Assignments of members no
    /// longer in the guild, of deleted roles, or of roles the member no longer holds are
    /// dropped without platform calls. Due assignments are revoked one by one with a fixed
    /// delay between calls; a failed revoke keeps the assignment for the next sweep. The
    /// whole sweep runs under the guild's lock and the store is saved once at the end.
    ///
    /// # Arguments
    /// - `guild_id` - Guild to sweep
    /// - `now` - Current time
    ///
    /// # Returns
    /// - `Ok(usize)` - Number of roles revoked
    /// - `Err(AppError)` - Snapshot could not be loaded or the store could not be saved
    pub async fn sweep(&self, guild_id: u64, now: DateTime<Utc>) -> Result<usize, AppError> {
        let _guard = self.state.guild_locks.lock(guild_id).await;

        let assignments = self.state.store.lock().await.guild_assignments(guild_id);
        if assignments.is_empty() {
            return Ok(0);
        }

        let snapshot = self.state.platform.snapshot(guild_id).await?;
        let mut changed = false;
        let mut due = Vec::new();

        {
            let mut store = self.state.store.lock().await;

            for assignment in assignments {
                if !store.is_managed(&assignment.role_name) {
                    continue;
                }

                let Some(member) = snapshot.member(assignment.user_id) else {
                    if snapshot.complete {
                        let dropped = store.remove_user_assignments(guild_id, assignment.user_id);
                        if dropped > 0 {
                            tracing::debug!(
                                "Dropped {} assignments of departed member {} in guild {}",
                                dropped,
                                assignment.user_id,
                                guild_id
                            );
                            changed = true;
                        }
                    }
                    continue;
                };

                let role = snapshot
                    .role_by_name(&assignment.role_name)
                    .filter(|role| member.holds(role.id));
                let Some(role) = role else {
                    changed |= store.remove_assignment(
                        guild_id,
                        assignment.user_id,
                        &assignment.role_name,
                    );
                    continue;
                };

                let retention_seconds =
                    store.retention(guild_id, assignment.user_id, &assignment.role_name);
                if assignment.remaining_seconds(retention_seconds, now) <= 0 {
                    due.push(DueRemoval {
                        role_id: role.id,
                        display_name: member.display_name.clone(),
                        retention_seconds,
                        assignment,
                    });
                }
            }
        }

        let audit = AuditLog::new(self.state);
        let mut removed = 0;

        for (position, entry) in due.iter().enumerate() {
            if position > 0 {
                tokio::time::sleep(self.state.config.member_delay).await;
            }

            let assignment = &entry.assignment;
            let reason = format!(
                "Automatic removal after {}",
                format_duration(entry.retention_seconds)
            );

            if let Err(e) = self
                .state
                .platform
                .remove_role(guild_id, assignment.user_id, entry.role_id, &reason)
                .await
            {
                tracing::error!(
                    "Failed to remove {} from {} in guild {}: {}",
                    assignment.role_name,
                    assignment.user_id,
                    guild_id,
                    e
                );
                continue;
            }

            self.state.store.lock().await.remove_assignment(
                guild_id,
                assignment.user_id,
                &assignment.role_name,
            );
            removed += 1;
            changed = true;

            let elapsed = (now - assignment.assigned_at).num_seconds();
            audit
                .success(
                    guild_id,
                    &format!(
                        "Removed '{}' from {} (assigned {}, elapsed {})",
                        assignment.role_name,
                        entry.display_name,
                        display(assignment.assigned_at, self.state.config.display_offset),
                        format_duration(elapsed)
                    ),
                )
                .await;
        }

        if changed {
            self.state.store.lock().await.save_all()?;
        }

        Ok(removed)
    }

    /// Sweeps every guild the bot is in, logging per-guild failures.
    ///
    /// # Returns
    /// - `Ok(usize)` - Total roles revoked across guilds
    /// - `Err(AppError)` - The guild list could not be loaded
    pub async fn sweep_all(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let mut total = 0;

        for guild_id in self.state.platform.guild_ids().await? {
            match self.sweep(guild_id, now).await {
                Ok(removed) => total += removed,
                Err(e) => tracing::error!("Expiry sweep failed for guild {}: {}", guild_id, e),
            }
        }

        Ok(total)
    }
}
