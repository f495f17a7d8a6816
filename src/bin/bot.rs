// Entry point for the Discord TLDR bot

use anyhow::Context;
use tldr::core::config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real deployments set the environment directly
    let _ = dotenvy::dotenv();
    tldr::setup_logging();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    info!(
        "Loaded configuration (model: {}, prefix: {:?}, timezone: {})",
        config.model_name(),
        config.command_prefix,
        config.timezone
    );

    tldr::discord::run(config)
        .await
        .context("Discord client stopped with an error")?;
    Ok(())
}
