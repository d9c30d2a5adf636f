use chrono::{DateTime, Utc};

use crate::{
    error::AppError,
    model::assignment::{RemainingTime, RemainingTimeReport, RetentionAction, RetentionAdjustment},
    service::audit::AuditLog,
    state::AppState,
    util::duration::format_duration,
};

/// Manages how long managed roles are kept.
pub struct RetentionService<'a> {
    state: &'a AppState,
}

impl<'a> RetentionService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Sets the default retention of a managed role.
    ///
    /// # Arguments
    /// - `guild_id` - Guild receiving the audit record
    /// - `role_name` - Managed role
    /// - `seconds` - New default, zero or more
    ///
    /// # Returns
    /// - `Ok(i64)` - Previous default
    /// - `Err(AppError::BadRequest)` - Role is not managed or `seconds` is negative
    pub async fn set_default_retention(
        &self,
        guild_id: u64,
        role_name: &str,
        seconds: i64,
    ) -> Result<i64, AppError> {
        if seconds < 0 {
            return Err(AppError::BadRequest("Retention must be zero or more".to_string()));
        }

        let previous = {
            let mut store = self.state.store.lock().await;
            if !store.is_managed(role_name) {
                return Err(AppError::BadRequest(format!("'{}' is not a managed role", role_name)));
            }

            let previous = store.default_retention(role_name);
            store.set_default_retention(role_name, seconds);
            store.save_all()?;
            previous
        };

        AuditLog::new(self.state)
            .info(
                guild_id,
                &format!(
                    "Default retention of '{}' changed from {} to {}",
                    role_name,
                    format_duration(previous),
                    format_duration(seconds)
                ),
            )
            .await;

        Ok(previous)
    }

    /// Adjusts the time left before a member's managed role expires.
    ///
    /// The action applies to the remaining time. A result of zero or less removes the
    /// member's override so the role default applies again; otherwise the override becomes
    /// `elapsed + new_remaining`.
    ///
    /// # Arguments
    /// - `guild_id` - Guild of the member
    /// - `user_id` - Member whose retention changes
    /// - `role_name` - Managed role
    /// - `action` - Add to, subtract from, or replace the remaining time
    /// - `delta_seconds` - Amount applied by the action, zero or more
    /// - `now` - Current time
    ///
    /// # Returns
    /// - `Ok(RetentionAdjustment)` - Previous and new remaining time, or the reset
    /// - `Err(AppError::BadRequest)` - Invalid role, negative delta, or role already due
    /// - `Err(AppError::NotFound)` - Member does not hold the role
    pub async fn adjust_retention(
        &self,
        guild_id: u64,
        user_id: u64,
        role_name: &str,
        action: RetentionAction,
        delta_seconds: i64,
        now: DateTime<Utc>,
    ) -> Result<RetentionAdjustment, AppError> {
        if delta_seconds < 0 {
            return Err(AppError::BadRequest("Duration must be zero or more".to_string()));
        }

        let adjustment = {
            let mut store = self.state.store.lock().await;
            if !store.is_managed(role_name) {
                return Err(AppError::BadRequest(format!("'{}' is not a managed role", role_name)));
            }

            let assigned_at = store.assigned_at(guild_id, user_id, role_name).ok_or_else(|| {
                AppError::NotFound(format!("User {} does not hold {}", user_id, role_name))
            })?;

            let elapsed = (now - assigned_at).num_seconds();
            let remaining = store.retention(guild_id, user_id, role_name) - elapsed;
            if remaining <= 0 {
                return Err(AppError::BadRequest(format!(
                    "{} of user {} is already due for removal",
                    role_name, user_id
                )));
            }

            let new_remaining = match action {
                RetentionAction::Add => remaining
                    .checked_add(delta_seconds)
                    .ok_or_else(|| AppError::BadRequest("Duration is too large".to_string()))?,
                RetentionAction::Subtract => (remaining - delta_seconds).max(0),
                RetentionAction::Set => delta_seconds,
            };

            let adjustment = if new_remaining <= 0 {
                store.clear_retention_override(guild_id, user_id, role_name);
                RetentionAdjustment::ResetToDefault {
                    previous_remaining: remaining,
                }
            } else {
                let retention = elapsed
                    .checked_add(new_remaining)
                    .ok_or_else(|| AppError::BadRequest("Duration is too large".to_string()))?;
                store.set_retention_override(guild_id, user_id, role_name, retention);
                RetentionAdjustment::Updated {
                    previous_remaining: remaining,
                    new_remaining,
                }
            };
            store.save_all()?;
            adjustment
        };

        let message = match adjustment {
            RetentionAdjustment::Updated {
                previous_remaining,
                new_remaining,
            } => format!(
                "Remaining time of '{}' for user {} changed from {} to {}",
                role_name,
                user_id,
                format_duration(previous_remaining),
                format_duration(new_remaining)
            ),
            RetentionAdjustment::ResetToDefault { .. } => format!(
                "Retention override of '{}' for user {} removed",
                role_name, user_id
            ),
        };
        AuditLog::new(self.state).info(guild_id, &message).await;

        Ok(adjustment)
    }

    /// Remaining time of every managed role for a member.
    pub async fn remaining_times(
        &self,
        guild_id: u64,
        user_id: u64,
        now: DateTime<Utc>,
    ) -> RemainingTimeReport {
        let store = self.state.store.lock().await;

        let roles = store
            .managed_roles()
            .iter()
            .map(|role_name| {
                let remaining = match store.assigned_at(guild_id, user_id, role_name) {
                    None => RemainingTime::NotAssigned,
                    Some(assigned_at) => {
                        let left = store.retention(guild_id, user_id, role_name)
                            - (now - assigned_at).num_seconds();
                        if left > 0 {
                            RemainingTime::Remaining(left)
                        } else {
                            RemainingTime::Due
                        }
                    }
                };
                (role_name.clone(), remaining)
            })
            .collect();

        RemainingTimeReport { user_id, roles }
    }
}
