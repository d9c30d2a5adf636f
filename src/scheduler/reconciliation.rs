use chrono::Utc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_retry2::{strategy::ExponentialBackoff, Retry, RetryError};

use crate::{
    error::AppError,
    model::sync::{SyncChanges, SyncKind},
    service::reconcile::ReconcileService,
    state::AppState,
};

/// Attempts per guild and cycle, including the first one.
const ATTEMPTS: usize = 3;

/// Pause between two guilds in one cycle.
const GUILD_DELAY: Duration = Duration::from_secs(1);

/// Starts the periodic reconciliation scheduler
///
/// Every `sync_interval` the job reconciles stored assignments of each guild against its
/// live roster and re-runs tenure promotion for members still holding a trigger role.
///
/// # Arguments
/// - `state`: Application state shared with the job
pub async fn start_scheduler(state: AppState) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;
    let interval = state.config.sync_interval;

    let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let state = state.clone();

        Box::pin(async move {
            if let Err(e) = reconcile_all(&state).await {
                tracing::error!("Error running periodic sync: {}", e);
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Reconciliation scheduler started ({}s interval)", interval.as_secs());

    Ok(())
}

/// Reconciles every guild the bot is in, one after another.
///
/// A guild whose snapshot or stored assignments still fail after all attempts is skipped
/// until the next cycle.
async fn reconcile_all(state: &AppState) -> Result<(), AppError> {
    let guild_ids = state.platform.guild_ids().await?;

    for (index, guild_id) in guild_ids.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(GUILD_DELAY).await;
        }

        match reconcile_with_retry(state, *guild_id).await {
            Ok(changes) if changes.is_empty() => {
                tracing::debug!("Periodic sync of guild {}: no changes", guild_id)
            }
            Ok(changes) => tracing::info!(
                "Periodic sync of guild {}: removed {}, added {}",
                guild_id,
                changes.removed,
                changes.added
            ),
            Err(e) => tracing::warn!(
                "Skipping periodic sync of guild {} after {} attempts: {}",
                guild_id,
                ATTEMPTS,
                e
            ),
        }
    }

    Ok(())
}

async fn reconcile_with_retry(state: &AppState, guild_id: u64) -> Result<SyncChanges, AppError> {
    // 1s, then 2s
    let retry_strategy = ExponentialBackoff::from_millis(2)
        .factor(500)
        .take(ATTEMPTS - 1);

    Retry::spawn(retry_strategy, move || async move {
        let result = async {
            let snapshot = state.platform.snapshot(guild_id).await?;
            ReconcileService::new(state)
                .reconcile(&snapshot, SyncKind::Periodic, Utc::now())
                .await
        }
        .await;

        result.map_err(|e| {
            tracing::warn!("Periodic sync of guild {} failed, will retry: {}", guild_id, e);
            RetryError::Transient {
                err: e,
                retry_after: None,
            }
        })
    })
    .await
}
