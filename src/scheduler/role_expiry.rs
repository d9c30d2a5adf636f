use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::{error::AppError, service::expiry::ExpiryService, state::AppState};

/// Starts the role expiry scheduler
///
/// Every `check_interval` the job sweeps all guilds and revokes managed roles whose
/// retention has run out.
///
/// # Arguments
/// - `state`: Application state shared with the job
pub async fn start_scheduler(state: AppState) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;
    let interval = state.config.check_interval;

    let job = Job::new_repeated_async(interval, move |_uuid, _lock| {
        let state = state.clone();

        Box::pin(async move {
            match ExpiryService::new(&state).sweep_all(Utc::now()).await {
                Ok(0) => {}
                Ok(removed) => tracing::info!("Expiry sweep removed {} roles", removed),
                Err(e) => tracing::error!("Error running expiry sweep: {}", e),
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Role expiry scheduler started ({}s interval)", interval.as_secs());

    Ok(())
}
