use serenity::http::Http;
use std::sync::Arc;

use rolekeeper::{
    bot,
    config::Config,
    error::AppError,
    platform::discord::SerenityPlatform,
    scheduler::{reconciliation, role_expiry},
    service::event::EventWorker,
    startup,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;
    if config.debug {
        tracing::warn!("Debug mode: short intervals and retention are in effect");
    }

    // A corrupt document aborts here instead of being overwritten later
    let store = startup::open_store(&config)?;

    let discord_http = Arc::new(Http::new(&config.discord_bot_token));
    let platform = Arc::new(SerenityPlatform::new(discord_http));

    let state = AppState::new(store, platform, config);

    let (worker, sender) = EventWorker::new(state.clone());
    tokio::spawn(worker.run());

    role_expiry::start_scheduler(state.clone()).await?;
    reconciliation::start_scheduler(state.clone()).await?;

    tracing::info!("Starting rolekeeper");

    bot::start::start_bot(&state.config, sender).await
}
