// Commands module
use crate::cli::Commands;
use crate::config::{load_settings, BridgeConfig};
use crate::pubsub::{GrpcConnector, Publisher};
use anyhow::Context;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Execute a CLI command
pub async fn execute_command(env_file: &Path, command: Commands) -> anyhow::Result<()> {
    if let Err(e) = load_settings(env_file) {
        warn!("Failed to load settings: {}", e);
    }
    let config = BridgeConfig::from_env();

    match command {
        Commands::Publish { message } => execute_publish(config, message).await,
        Commands::Config => execute_config(&config),
    }
}

async fn execute_publish(config: BridgeConfig, message: String) -> anyhow::Result<()> {
    let publisher = Publisher::new(config, Arc::new(GrpcConnector::new()));

    let id = publisher
        .publish(message.into_bytes().into())
        .await
        .context("Failed to publish message")?;

    info!(message_id = %id, "Message published successfully");
    println!("{}", id);
    Ok(())
}

fn execute_config(config: &BridgeConfig) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(config).context("Failed to render configuration")?;
    println!("{}", rendered);
    Ok(())
}
