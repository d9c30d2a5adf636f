use chrono::Utc;
use tokio::sync::mpsc;

use crate::{
    error::AppError,
    model::{event::RoleEvent, guild::MemberSnapshot, sync::SyncKind},
    service::{
        audit::{AuditLevel, AuditLog},
        expiry::ExpiryService,
        grant::GrantService,
        reconcile::ReconcileService,
        tenure::TenureService,
    },
    state::AppState,
};

/// Sending half of the inbound event queue, held by the gateway handler.
pub type EventSender = mpsc::UnboundedSender<RoleEvent>;

/// Pushes an event onto the queue.
///
/// # Returns
/// - `Ok(())` - Event queued
/// - `Err(AppError::InternalError)` - The worker has stopped and the event was dropped
pub fn enqueue(sender: &EventSender, event: RoleEvent) -> Result<(), AppError> {
    let guild_id = event.guild_id();
    sender.send(event).map_err(|_| {
        AppError::InternalError(format!(
            "Event worker stopped, dropping event for guild {}",
            guild_id
        ))
    })
}

/// Consumes inbound platform events and drives reconciliation and promotion.
pub struct EventWorker {
    state: AppState,
    receiver: mpsc::UnboundedReceiver<RoleEvent>,
}

impl EventWorker {
    /// Creates the worker together with the sender feeding it.
    pub fn new(state: AppState) -> (Self, EventSender) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { state, receiver }, sender)
    }

    /// Processes events until every sender is dropped.
    pub async fn run(mut self) {
        while let Some(event) = self.receiver.recv().await {
            let guild_id = event.guild_id();
            if let Err(e) = handle_event(&self.state, event).await {
                tracing::error!("Failed to handle event for guild {}: {}", guild_id, e);
            }
        }

        tracing::info!("Event queue closed, worker stopping");
    }
}

/// Handles a single inbound event.
///
/// # Arguments
/// - `state` - Application state
/// - `event` - Event to handle
///
/// # Returns
/// - `Ok(())` - Event handled; per-item platform failures are logged inside
/// - `Err(AppError)` - Snapshot, reload or save failed
pub async fn handle_event(state: &AppState, event: RoleEvent) -> Result<(), AppError> {
    match event {
        RoleEvent::GuildAvailable { guild_id } => guild_available(state, guild_id).await,
        RoleEvent::MemberRolesAdded {
            guild_id,
            member,
            added_role_ids,
        } => member_roles_added(state, guild_id, &member, &added_role_ids).await,
    }
}

async fn guild_available(state: &AppState, guild_id: u64) -> Result<(), AppError> {
    let audit = AuditLog::new(state);
    audit.info(guild_id, "Bot started").await;

    let now = Utc::now();
    let snapshot = state.platform.snapshot(guild_id).await?;

    if let Err(e) = ReconcileService::new(state)
        .reconcile(&snapshot, SyncKind::Startup, now)
        .await
    {
        audit
            .log(guild_id, AuditLevel::Error, &format!("Startup sync skipped: {}", e))
            .await;
    }

    let removed = ExpiryService::new(state).sweep(guild_id, now).await?;
    if removed > 0 {
        tracing::info!("Startup sweep removed {} roles in guild {}", removed, guild_id);
    }

    Ok(())
}

async fn member_roles_added(
    state: &AppState,
    guild_id: u64,
    member: &MemberSnapshot,
    added_role_ids: &[u64],
) -> Result<(), AppError> {
    if member.is_bot || added_role_ids.is_empty() {
        return Ok(());
    }

    let roles = state.platform.roles(guild_id).await?;
    let now = Utc::now();
    let grants = GrantService::new(state);
    let tenure = TenureService::new(state);

    for role_id in added_role_ids {
        let Some(role) = roles.iter().find(|role| role.id == *role_id) else {
            continue;
        };

        if let Err(e) = grants.register_external_grant(guild_id, member, &role.name, now).await {
            tracing::error!(
                "Failed to register {} for {} in guild {}: {}",
                role.name,
                member.user_id,
                guild_id,
                e
            );
        }

        tenure.apply(guild_id, &roles, member, role, now).await;
    }

    Ok(())
}
