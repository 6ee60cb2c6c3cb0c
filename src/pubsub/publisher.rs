//! Publish client.
//!
//! Each call validates the configuration, opens a fresh session through the
//! connector, publishes one message and drops the session. The whole attempt
//! runs under the configured deadline; there is no retry or batching.

use crate::config::BridgeConfig;
use crate::error::{Error, Result};
use crate::pubsub::client::{BrokerConnector, ConnectOptions};
use crate::pubsub::types::{MessageId, OutboundMessage, TopicName};
use std::sync::Arc;
use tracing::debug;

/// Publishes single messages to the configured topic.
#[derive(Clone)]
pub struct Publisher {
    config: BridgeConfig,
    connector: Arc<dyn BrokerConnector>,
}

impl Publisher {
    /// Create a publisher for a configuration and broker connector.
    pub fn new(config: BridgeConfig, connector: Arc<dyn BrokerConnector>) -> Self {
        Self { config, connector }
    }

    /// Configuration this publisher was built with.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Publish one message and wait for the broker-assigned ID.
    pub async fn publish(&self, message: OutboundMessage) -> Result<MessageId> {
        self.config.validate()?;

        let deadline = self.config.publish_timeout;
        match tokio::time::timeout(deadline, self.publish_once(message)).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(deadline)),
        }
    }

    async fn publish_once(&self, message: OutboundMessage) -> Result<MessageId> {
        let options = ConnectOptions::from_config(&self.config);
        let mut session = self.connector.connect(&options).await?;

        let topic = TopicName::new(&self.config.project_id, &self.config.topic_id);
        debug!("Publish: {} bytes to {}", message.len(), topic);

        session.publish(&topic.to_string(), message).await
    }
}
