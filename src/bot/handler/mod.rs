use serenity::all::{Context, EventHandler, Guild, GuildMemberUpdateEvent, Member, Ready};
use serenity::async_trait;

use crate::{
    model::event::RoleEvent,
    service::event::{enqueue as queue_event, EventSender},
};

pub mod guild;
pub mod member;
pub mod ready;

/// Discord bot event handler
pub struct Handler {
    pub sender: EventSender,
}

impl Handler {
    pub fn new(sender: EventSender) -> Self {
        Self { sender }
    }

    fn enqueue(&self, event: RoleEvent) {
        if let Err(e) = queue_event(&self.sender, event) {
            tracing::error!("{}", e);
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(ctx, ready).await;
    }

    /// Called when a guild becomes available or the bot joins a new guild
    async fn guild_create(&self, _ctx: Context, guild: Guild, _is_new: Option<bool>) {
        self.enqueue(guild::handle_guild_create(&guild));
    }

    /// Called when a member is updated in a guild (roles, nickname, etc.)
    async fn guild_member_update(
        &self,
        _ctx: Context,
        old: Option<Member>,
        new: Option<Member>,
        event: GuildMemberUpdateEvent,
    ) {
        let update = member::handle_guild_member_update(old.as_ref(), new.as_ref(), &event);
        if let Some(update) = update {
            self.enqueue(update);
        }
    }
}
