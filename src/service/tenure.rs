use chrono::{DateTime, Utc};

use crate::{
    model::{
        guild::{find_role_by_name, GuildRole, MemberSnapshot},
        tenure::TenureOutcome,
    },
    service::audit::AuditLog,
    state::AppState,
};

/// Promotes members by tenure when they receive a trigger role.
pub struct TenureService<'a> {
    state: &'a AppState,
}

impl<'a> TenureService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Evaluates the tenure rule attached to a role the member newly holds.
    ///
    /// Without a rule for `trigger` nothing happens. Otherwise the member receives the rule's
    /// target role when their whole days since joining reach the rule's threshold, and the
    /// trigger role is revoked regardless of the outcome. Platform failures are logged and do
    /// not stop the remaining steps.
    ///
    /// # Arguments
    /// - `guild_id` - Guild the member belongs to
    /// - `roles` - Roles defined in the guild, used to resolve the target role by name
    /// - `member` - Member holding the trigger role
    /// - `trigger` - The trigger role
    /// - `now` - Current time
    ///
    /// # Returns
    /// - `TenureOutcome` - Whether a rule matched and what was granted and removed
    pub async fn apply(
        &self,
        guild_id: u64,
        roles: &[GuildRole],
        member: &MemberSnapshot,
        trigger: &GuildRole,
        now: DateTime<Utc>,
    ) -> TenureOutcome {
        let rule = {
            let store = self.state.store.lock().await;
            store.tenure_rule(guild_id, &trigger.name).cloned()
        };

        let Some(rule) = rule else {
            return TenureOutcome::default();
        };

        let audit = AuditLog::new(self.state);
        let mut outcome = TenureOutcome {
            rule_matched: true,
            ..Default::default()
        };

        let tenure_days = member.tenure_days(now);
        if tenure_days >= i64::from(rule.tenure_days) {
            match find_role_by_name(roles, &rule.target_role) {
                None => {
                    audit
                        .warning(
                            guild_id,
                            &format!(
                                "Tenure rule for '{}' targets role '{}', which does not exist",
                                trigger.name, rule.target_role
                            ),
                        )
                        .await;
                }
                Some(target) if member.holds(target.id) => {
                    tracing::debug!(
                        "{} already holds {}, skipping tenure grant",
                        member.display_name,
                        target.name
                    );
                }
                Some(target) => {
                    let reason = format!(
                        "Tenure rule: {} days or more on receiving {}",
                        rule.tenure_days, trigger.name
                    );
                    match self
                        .state
                        .platform
                        .add_role(guild_id, member.user_id, target.id, &reason)
                        .await
                    {
                        Ok(()) => {
                            outcome.granted = true;
                            audit
                                .success(
                                    guild_id,
                                    &format!(
                                        "{} joined {} days ago; granted {} on receiving {}",
                                        member.display_name, tenure_days, target.name, trigger.name
                                    ),
                                )
                                .await;
                        }
                        Err(e) => {
                            tracing::error!(
                                "Failed to grant tenure role {} to {}: {}",
                                target.name,
                                member.user_id,
                                e
                            );
                        }
                    }
                }
            }
        }

        if member.holds(trigger.id) {
            match self
                .state
                .platform
                .remove_role(
                    guild_id,
                    member.user_id,
                    trigger.id,
                    "Trigger role removed after tenure check",
                )
                .await
            {
                Ok(()) => {
                    outcome.trigger_removed = true;
                    let message = format!(
                        "Removed trigger role '{}' from {}",
                        trigger.name, member.display_name
                    );
                    audit.info(guild_id, &message).await;
                }
                Err(e) => {
                    tracing::error!(
                        "Failed to remove trigger role {} from {}: {}",
                        trigger.name,
                        member.user_id,
                        e
                    );
                }
            }
        }

        outcome
    }
}
