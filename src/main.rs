use std::path::PathBuf;

use anyhow::Context;
use api::{AppConfig, ConfigSource, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if present.
    dotenvy::dotenv().ok();

    let config_path =
        PathBuf::from(std::env::var("APP_CONFIG").unwrap_or_else(|_| "config.yaml".into()));
    let (cfg, source) = AppConfig::load(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    let _log_guard = telemetry::init(&cfg.logging).context("initialising logging")?;
    if source == ConfigSource::Defaults {
        info!(path = %config_path.display(), "config file not found, using defaults");
    }
    info!(config = %config_path.display(), "starting rag-chat-backend");

    api::start(cfg).await?;

    Ok(())
}
