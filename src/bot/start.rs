use serenity::all::{Client, GatewayIntents};

use crate::{bot::handler::Handler, config::Config, error::AppError, service::event::EventSender};

/// Connects to the Discord gateway and forwards events until shutdown.
///
/// # Arguments
/// - `config` - Application configuration
/// - `sender` - Event queue the handlers push onto
///
/// # Returns
/// - `Ok(())` if the bot starts and runs successfully
/// - `Err(AppError)` if bot initialization or connection fails
pub async fn start_bot(config: &Config, sender: EventSender) -> Result<(), AppError> {
    // GUILD_MEMBERS is a privileged intent - must be enabled in Discord Developer Portal
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MEMBERS;

    let handler = Handler::new(sender);

    let mut client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(handler)
        .await?;

    tracing::info!("Starting Discord bot...");

    // Blocks until shutdown
    client.start().await?;

    Ok(())
}
