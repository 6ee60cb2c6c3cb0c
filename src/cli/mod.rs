// CLI module for pubsub-bridge
/// Command execution handlers
pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line interface for pubsub-bridge
#[derive(Parser)]
#[command(name = "pubsub-bridge")]
#[command(author, version, about = "Publish messages to GCP Pub/Sub using the bridge configuration", long_about = None)]
pub struct Cli {
    /// Settings file loaded before resolving configuration
    #[arg(long, global = true, env = "PUBSUB_ENV_FILE", default_value = ".env")]
    pub env_file: PathBuf,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Publish a single message to the configured topic
    Publish {
        /// Message text
        message: String,
    },

    /// Show the resolved configuration
    Config,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_publish() {
        let cli = Cli::try_parse_from(["pubsub-bridge", "publish", "hello"]).unwrap();
        assert_eq!(cli.env_file, PathBuf::from(".env"));
        assert!(matches!(cli.command, Commands::Publish { message } if message == "hello"));
    }

    #[test]
    fn test_parse_env_file_after_subcommand() {
        let cli = Cli::try_parse_from(["pubsub-bridge", "config", "--env-file", "prod.env"]).unwrap();
        assert_eq!(cli.env_file, PathBuf::from("prod.env"));
        assert!(matches!(cli.command, Commands::Config));
    }

    #[test]
    fn test_publish_requires_message() {
        assert!(Cli::try_parse_from(["pubsub-bridge", "publish"]).is_err());
    }
}
