//! Request authentication for the broker connection.

use crate::config::BridgeConfig;
use crate::error::{Error, Result};
use gcp_auth::TokenProvider;
use tracing::debug;

/// OAuth scope required to publish.
pub const PUBSUB_SCOPE: &str = "https://www.googleapis.com/auth/pubsub";

/// How requests to the broker are authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authentication {
    /// No credentials; used for plaintext emulator endpoints.
    None,
    /// A fixed bearer token.
    Static(String),
    /// Application Default Credentials: service-account key file, gcloud
    /// user credentials or the GCE metadata server.
    ApplicationDefault,
}

impl Authentication {
    /// Pick the authentication mode for a configuration.
    ///
    /// An explicit token always wins; plaintext endpoints get no credentials.
    pub fn from_config(config: &BridgeConfig) -> Self {
        match &config.access_token {
            Some(token) => Authentication::Static(token.clone()),
            None if config.is_plaintext() => Authentication::None,
            None => Authentication::ApplicationDefault,
        }
    }

    /// Resolve the bearer token to send, if any.
    pub async fn bearer_token(&self) -> Result<Option<String>> {
        match self {
            Authentication::None => Ok(None),
            Authentication::Static(token) => Ok(Some(token.clone())),
            Authentication::ApplicationDefault => application_default_token().await.map(Some),
        }
    }
}

/// Fetch a Pub/Sub-scoped access token through Application Default Credentials.
pub async fn application_default_token() -> Result<String> {
    let provider = gcp_auth::provider()
        .await
        .map_err(|e| Error::ClientInit(format!("No application default credentials: {}", e)))?;

    let token = provider
        .token(&[PUBSUB_SCOPE])
        .await
        .map_err(|e| Error::ClientInit(format!("Failed to obtain access token: {}", e)))?;

    debug!("Obtained access token via application default credentials");
    Ok(token.as_str().to_string())
}
