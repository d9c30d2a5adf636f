use crate::model::guild::MemberSnapshot;

/// Inbound platform events consumed by the event worker.
///
/// Gateway handlers translate Serenity callbacks into these values and push them onto the
/// queue, so the reconciliation and promotion logic never runs inside the SDK's dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum RoleEvent {
    /// A guild became available (startup, reconnect, or the bot joined it).
    GuildAvailable { guild_id: u64 },

    /// A member gained roles.
    ///
    /// When the previous member state is unknown every currently held role is listed.
    MemberRolesAdded {
        guild_id: u64,
        member: MemberSnapshot,
        added_role_ids: Vec<u64>,
    },
}

impl RoleEvent {
    /// Guild the event belongs to.
    pub fn guild_id(&self) -> u64 {
        match self {
            Self::GuildAvailable { guild_id } => *guild_id,
            Self::MemberRolesAdded { guild_id, .. } => *guild_id,
        }
    }
}
