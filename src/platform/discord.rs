use serenity::{
    all::{ChannelId, ChannelType, CreateMessage, GuildId, RoleId, UserId},
    async_trait,
    http::Http,
};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::{
    error::AppError,
    model::guild::{GuildRole, GuildSnapshot, MemberSnapshot},
    platform::GuildPlatform,
};

/// Members requested per roster page, the API maximum.
const MEMBER_PAGE_SIZE: u64 = 1000;

/// [`GuildPlatform`] backed by Serenity's REST client.
pub struct SerenityPlatform {
    http: Arc<Http>,
    bot_user_id: OnceCell<u64>,
}

impl SerenityPlatform {
    pub fn new(http: Arc<Http>) -> Self {
        Self {
            http,
            bot_user_id: OnceCell::new(),
        }
    }

    /// The bot's own user ID, fetched once.
    async fn bot_user_id(&self) -> Option<u64> {
        let result = self
            .bot_user_id
            .get_or_try_init(|| async {
                self.http
                    .get_current_user()
                    .await
                    .map(|user| user.id.get())
            })
            .await;

        match result {
            Ok(id) => Some(*id),
            Err(e) => {
                tracing::warn!("Failed to fetch current user: {}", e);
                None
            }
        }
    }

    /// Loads the full roster page by page.
    ///
    /// # Returns
    /// - `(members, true)` - Every page was loaded
    /// - `(members, false)` - A page request failed; `members` holds what was loaded before
    async fn fetch_members(&self, guild_id: GuildId) -> (Vec<MemberSnapshot>, bool) {
        let mut members = Vec::new();
        let mut after: Option<u64> = None;

        loop {
            let page = match self
                .http
                .get_guild_members(guild_id, Some(MEMBER_PAGE_SIZE), after)
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(
                        "Failed to fetch members of guild {} after {:?}: {}",
                        guild_id,
                        after,
                        e
                    );
                    return (members, false);
                }
            };

            let page_len = page.len() as u64;
            after = page.last().map(|member| member.user.id.get());
            members.extend(page.iter().map(MemberSnapshot::from_member));

            if page_len < MEMBER_PAGE_SIZE {
                return (members, true);
            }
        }
    }

    /// First text channel of the guild by position.
    async fn fallback_channel(&self, guild_id: u64) -> Result<Option<ChannelId>, AppError> {
        let channels = self.http.get_channels(GuildId::new(guild_id)).await?;

        Ok(channels
            .into_iter()
            .filter(|channel| channel.kind == ChannelType::Text)
            .min_by_key(|channel| (channel.position, channel.id))
            .map(|channel| channel.id))
    }
}

#[async_trait]
impl GuildPlatform for SerenityPlatform {
    async fn guild_ids(&self) -> Result<Vec<u64>, AppError> {
        let guilds = self.http.get_guilds(None, None).await?;
        Ok(guilds.into_iter().map(|guild| guild.id.get()).collect())
    }

    async fn snapshot(&self, guild_id: u64) -> Result<GuildSnapshot, AppError> {
        let id = GuildId::new(guild_id);
        let guild = self.http.get_guild(id).await?;
        let bot_user_id = self.bot_user_id().await;
        let (members, complete) = self.fetch_members(id).await;

        tracing::debug!(
            "Fetched {} members of guild {} ({})",
            members.len(),
            guild.name,
            if complete { "complete" } else { "incomplete" }
        );

        Ok(GuildSnapshot {
            guild_id,
            name: guild.name,
            complete,
            roles: guild.roles.values().map(GuildRole::from_role).collect(),
            members,
            bot_user_id,
        })
    }

    async fn roles(&self, guild_id: u64) -> Result<Vec<GuildRole>, AppError> {
        let roles = self.http.get_guild_roles(GuildId::new(guild_id)).await?;
        Ok(roles.iter().map(GuildRole::from_role).collect())
    }

    async fn add_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
        reason: &str,
    ) -> Result<(), AppError> {
        self.http
            .add_member_role(
                GuildId::new(guild_id),
                UserId::new(user_id),
                RoleId::new(role_id),
                Some(reason),
            )
            .await?;
        Ok(())
    }

    async fn remove_role(
        &self,
        guild_id: u64,
        user_id: u64,
        role_id: u64,
        reason: &str,
    ) -> Result<(), AppError> {
        self.http
            .remove_member_role(
                GuildId::new(guild_id),
                UserId::new(user_id),
                RoleId::new(role_id),
                Some(reason),
            )
            .await?;
        Ok(())
    }

    async fn send_audit(
        &self,
        guild_id: u64,
        channel_id: Option<u64>,
        content: &str,
    ) -> Result<(), AppError> {
        let channel = match channel_id {
            Some(id) => Some(ChannelId::new(id)),
            None => self.fallback_channel(guild_id).await?,
        };

        let Some(channel) = channel else {
            tracing::debug!("No text channel available for audit messages in guild {}", guild_id);
            return Ok(());
        };

        channel
            .send_message(&self.http, CreateMessage::new().content(content))
            .await?;
        Ok(())
    }
}
