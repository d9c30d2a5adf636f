use serenity::async_trait;
use std::{
    collections::{BTreeMap, HashSet},
    sync::Mutex,
};

use crate::{
    error::AppError,
    model::guild::{GuildRole, GuildSnapshot},
    platform::GuildPlatform,
};

/// A platform call recorded by [`MockPlatform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    AddRole {
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    },
    RemoveRole {
        guild_id: u64,
        user_id: u64,
        role_id: u64,
    },
    Audit {
        guild_id: u64,
        channel_id: Option<u64>,
        content: String,
    },
}

#[derive(Default)]
struct MockState {
    guilds: BTreeMap<u64, GuildSnapshot>,
    calls: Vec<PlatformCall>,
    failing_roles: HashSet<u64>,
}

/// In-memory [`GuildPlatform`] that mutates its own guild snapshots and records calls.
#[derive(Default)]
pub struct MockPlatform {
    state: Mutex<MockState>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a guild to the mock.
    pub fn with_guild(self, snapshot: GuildSnapshot) -> Self {
        self.state
            .lock()
            .unwrap()
            .guilds
            .insert(snapshot.guild_id, snapshot);
        self
    }

    /// Makes every add or remove of `role_id` fail.
    pub fn fail_role_changes(&self, role_id: u64) {
        self.state.lock().unwrap().failing_roles.insert(role_id);
    }

    /// Stops failing changes of `role_id`.
    pub fn heal_role_changes(&self, role_id: u64) {
        self.state.lock().unwrap().failing_roles.remove(&role_id);
    }

    /// Marks a guild roster as complete or incomplete.
    pub fn set_complete(&self, guild_id: u64, complete: bool) {
        if let Some(guild) = self.state.lock().unwrap().guilds.get_mut(&guild_id) {
            guild.complete = complete;
        }
    }

    /// Removes a member from a guild roster.
    pub fn remove_member(&self, guild_id: u64, user_id: u64) {
        if let Some(guild) = self.state.lock().unwrap().guilds.get_mut(&guild_id) {
            guild.members.retain(|member| member.user_id != user_id);
        }
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    /// `(user_id, role_id)` of every successful or attempted grant.
    pub fn added_roles(&self) -> Vec<(u64, u64)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::AddRole { user_id, role_id, .. } => Some((user_id, role_id)),
                _ => None,
            })
            .collect()
    }

    /// `(user_id, role_id)` of every successful or attempted revoke.
    pub fn removed_roles(&self) -> Vec<(u64, u64)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::RemoveRole { user_id, role_id, .. } => Some((user_id, role_id)),
                _ => None,
            })
            .collect()
    }

    /// Content of every audit message.
    pub fn audits(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                PlatformCall::Audit { content, .. } => Some(content),
                _ => None,
            })
            .collect()
    }

    /// Role IDs a member currently holds in the mock.
    pub fn member_roles(&self, guild_id: u64, user_id: u64) -> Vec<u64> {
        self.state
            .lock()
            .unwrap()
            .guilds
            .get(&guild_id)
            .and_then(|guild| guild.member(user_id))
            .map(|member| member.role_ids.clone())
            .unwrap_or_default()
    }

    fn change_role(&self, call: PlatformCall, grant: bool) -> Result<(), AppError> {
        let (guild_id, user_id, role_id) = match &call {
            PlatformCall::AddRole { guild_id, user_id, role_id }
            | PlatformCall::RemoveRole {
                guild_id,
                user_id,
                role_id,
            } => (*guild_id, *user_id, *role_id),
            PlatformCall::Audit { .. } => unreachable!("audit is not a role change"),
        };

        let mut state = self.state.lock().unwrap();
        state.calls.push(call);

        if state.failing_roles.contains(&role_id) {
            return Err(AppError::InternalError(format!(
                "injected failure for role {}",
                role_id
            )));
        }

        let member = state
            .guilds
            .get_mut(&guild_id)
            .and_then(|guild| guild.members.iter_mut().find(|m| m.user_id == user_id))
            .ok_or_else(|| {
                AppError::NotFound(format!("member {} not in guild {}", user_id, guild_id))
            })?;

        if grant {
            if !member.role_ids.contains(&role_id) {
                member.role_ids.push(role_id);
            }
        } else {
            member.role_ids.retain(|id| *id != role_id);
        }
        Ok(())
    }
}

#[async_trait]
impl GuildPlatform for MockPlatform {
    async fn guild_ids(&self) -> Result<Vec<u64>, AppError> {
        Ok(self.state.lock().unwrap().guilds.keys().copied().collect())
    }

    async fn snapshot(&self, guild_id: u64) -> Result<GuildSnapshot, AppError> {
        self.state
            .lock()
            .unwrap()
            .guilds
            .get(&guild_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("guild {}", guild_id)))
    }

    async fn roles(&self, guild_id: u64) -> Result<Vec<GuildRole>, AppError> {
        Ok(self.snapshot(guild_id).await?.roles)
    }

    async fn add_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
        _reason: &str,
    ) -> Result<(), AppError> {
        self.change_role(
            PlatformCall::AddRole {
                guild_id,
                user_id,
                role_id,
            },
            true,
        )
    }

    async fn remove_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
        _reason: &str,
    ) -> Result<(), AppError> {
        self.change_role(
            PlatformCall::RemoveRole {
                guild_id,
                user_id,
                role_id,
            },
            false,
        )
    }

    async fn send_audit(
        &self,
        guild_id: u64,
        channel_id: Option<u64>,
        content: &str,
    ) -> Result<(), AppError> {
        self.state.lock().unwrap().calls.push(PlatformCall::Audit {
            guild_id,
            channel_id,
            content: content.to_string(),
        });
        Ok(())
    }
}
