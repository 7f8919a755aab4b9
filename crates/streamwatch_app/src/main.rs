use std::sync::Arc;

use anyhow::Context;
use streamwatch_app::config::Config;
use streamwatch_app::health;
use streamwatch_app::logging::{self, LogDestination};
use streamwatch_app::monitor::MonitorController;
use streamwatch_core::StreamFilter;
use streamwatch_engine::{DiscordSettings, DiscordSink, HelixCatalog, HelixSettings};
use watch_logging::watch_info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::initialize(LogDestination::Terminal);

    let config = Config::from_env().context("invalid startup configuration")?;

    let catalog = HelixCatalog::new(HelixSettings::new(
        config.twitch_client_id.clone(),
        config.twitch_client_secret.clone(),
        config.game_ids.clone(),
    ))
    .context("building Twitch catalog client")?;

    let sink = DiscordSink::new(DiscordSettings::new(
        config.discord_bot_token.clone(),
        config.discord_channel_id.clone(),
    ))
    .context("building Discord notification sink")?;

    let filter = StreamFilter::new(
        config.game_ids.clone(),
        config.keywords.clone(),
        config.tags.clone(),
    );

    let controller = MonitorController::new(
        Arc::new(catalog),
        Arc::new(sink),
        filter,
        config.poll_interval,
    );

    tokio::spawn(health::serve(config.health_port));

    // Monitoring begins immediately; an attached command dispatcher can stop
    // and restart it through `commands::dispatch`, gated on `required_role`.
    controller.start().await;
    watch_info!(
        "Streamwatch started; polling every {:?} for games {:?}",
        config.poll_interval,
        config.game_ids
    );

    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;
    watch_info!("Shutdown requested");
    controller.stop().await;

    Ok(())
}
