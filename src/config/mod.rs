//! Configuration system for pubsub-bridge.
//!
//! Settings are read from the process environment, optionally seeded from a
//! `.env` file (see [`settings`]). The result is an immutable [`BridgeConfig`]
//! that is handed to the publisher.

pub mod settings;

pub use settings::{load_settings, parse_line, parse_settings, SettingsEntry, DEFAULT_SETTINGS_FILE};

use crate::error::{Error, Result};
use serde::Serialize;
use std::time::Duration;
use tracing::warn;

/// Project the topic lives under.
pub const PROJECT_ID_VAR: &str = "PUBSUB_PROJECT_ID";
/// Topic messages are published to.
pub const TOPIC_ID_VAR: &str = "PUBSUB_TOPIC_ID";
/// `host:port` of a local emulator; switches to plaintext transport.
pub const EMULATOR_HOST_VAR: &str = "PUBSUB_EMULATOR_HOST";
/// Explicit broker endpoint URI.
pub const ENDPOINT_VAR: &str = "PUBSUB_ENDPOINT";
/// Server certificate verification is skipped unless this is falsy.
pub const TLS_SKIP_VERIFY_VAR: &str = "PUBSUB_TLS_SKIP_VERIFY";
/// Publish deadline in whole seconds.
pub const PUBLISH_TIMEOUT_VAR: &str = "PUBSUB_PUBLISH_TIMEOUT_SECS";
/// OAuth bearer token sent with each request.
pub const ACCESS_TOKEN_VAR: &str = "PUBSUB_ACCESS_TOKEN";
/// Settings file loaded by the C entry points.
pub const ENV_FILE_VAR: &str = "PUBSUB_ENV_FILE";

/// Production Pub/Sub endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://pubsub.googleapis.com";
/// Deadline covering connection setup, publish and acknowledgment.
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(30);

/// Server certificate policy for the TLS transport.
///
/// Security caveat: the default, `SkipVerification`, accepts any certificate
/// the endpoint presents, so any server can claim to be the broker. Set
/// `PUBSUB_TLS_SKIP_VERIFY=false` to verify against the webpki roots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TlsPolicy {
    /// Verify the server chain against the webpki roots.
    Verify,
    /// Accept any server certificate.
    #[default]
    SkipVerification,
}

/// Resolved bridge configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BridgeConfig {
    /// Project identifier; empty when unset.
    pub project_id: String,
    /// Topic identifier; empty when unset.
    pub topic_id: String,
    /// Broker endpoint URI.
    pub endpoint: String,
    /// Certificate verification policy.
    pub tls: TlsPolicy,
    /// Deadline for a whole publish attempt.
    pub publish_timeout: Duration,
    /// Bearer token attached to requests.
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            topic_id: String::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            tls: TlsPolicy::default(),
            publish_timeout: DEFAULT_PUBLISH_TIMEOUT,
            access_token: None,
        }
    }
}

impl BridgeConfig {
    /// Create a configuration for the given project and topic with defaults
    /// for everything else.
    pub fn new(project_id: impl Into<String>, topic_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            topic_id: topic_id.into(),
            ..Self::default()
        }
    }

    /// Resolve configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve configuration from an arbitrary key lookup.
    ///
    /// Missing required keys are recorded as empty strings and reported with
    /// a warning; resolution itself never fails.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let project_id = value(PROJECT_ID_VAR).unwrap_or_default();
        let topic_id = value(TOPIC_ID_VAR).unwrap_or_default();

        let missing = missing_keys(&project_id, &topic_id);
        if !missing.is_empty() {
            warn!(
                "Required settings are not defined: {}; publishing will fail",
                missing.join(", ")
            );
        }

        let endpoint = match value(EMULATOR_HOST_VAR) {
            Some(host) => format!("http://{}", host),
            None => value(ENDPOINT_VAR).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        };

        let tls = match value(TLS_SKIP_VERIFY_VAR).map(|v| parse_bool(&v)) {
            Some(Some(false)) => TlsPolicy::Verify,
            Some(Some(true)) | None => TlsPolicy::SkipVerification,
            Some(None) => {
                warn!("Ignoring unrecognized {} value", TLS_SKIP_VERIFY_VAR);
                TlsPolicy::SkipVerification
            }
        };

        let publish_timeout = match value(PUBLISH_TIMEOUT_VAR) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(
                        "Ignoring invalid {}={:?}, using {:?}",
                        PUBLISH_TIMEOUT_VAR, raw, DEFAULT_PUBLISH_TIMEOUT
                    );
                    DEFAULT_PUBLISH_TIMEOUT
                }
            },
            None => DEFAULT_PUBLISH_TIMEOUT,
        };

        Self {
            project_id,
            topic_id,
            endpoint,
            tls,
            publish_timeout,
            access_token: value(ACCESS_TOKEN_VAR),
        }
    }

    /// Check that both required identifiers are present.
    pub fn validate(&self) -> Result<()> {
        let missing = missing_keys(&self.project_id, &self.topic_id);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingConfig(format!("{} not set", missing.join(", "))))
        }
    }

    /// Whether the endpoint is reached over plaintext HTTP/2.
    pub fn is_plaintext(&self) -> bool {
        self.endpoint.starts_with("http://")
    }
}

fn missing_keys(project_id: &str, topic_id: &str) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if project_id.is_empty() {
        missing.push(PROJECT_ID_VAR);
    }
    if topic_id.is_empty() {
        missing.push(TOPIC_ID_VAR);
    }
    missing
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::from_lookup(lookup(&[
            (PROJECT_ID_VAR, "p1"),
            (TOPIC_ID_VAR, "t1"),
        ]));
        assert_eq!(config.project_id, "p1");
        assert_eq!(config.topic_id, "t1");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.tls, TlsPolicy::SkipVerification);
        assert_eq!(config.publish_timeout, Duration::from_secs(30));
        assert_eq!(config.access_token, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_required_keys_resolve_to_empty() {
        let config = BridgeConfig::from_lookup(lookup(&[(TOPIC_ID_VAR, "t1")]));
        assert_eq!(config.project_id, "");
        assert_eq!(config.topic_id, "t1");

        match config.validate() {
            Err(Error::MissingConfig(msg)) => assert!(msg.contains(PROJECT_ID_VAR)),
            other => panic!("expected MissingConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_both_keys_missing() {
        let config = BridgeConfig::from_lookup(lookup(&[]));
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains(PROJECT_ID_VAR));
        assert!(err.contains(TOPIC_ID_VAR));
    }

    #[test]
    fn test_emulator_host_overrides_endpoint() {
        let config = BridgeConfig::from_lookup(lookup(&[
            (EMULATOR_HOST_VAR, "localhost:8085"),
            (ENDPOINT_VAR, "https://example.com"),
        ]));
        assert_eq!(config.endpoint, "http://localhost:8085");
        assert!(config.is_plaintext());
    }

    #[test]
    fn test_explicit_endpoint() {
        let config = BridgeConfig::from_lookup(lookup(&[(ENDPOINT_VAR, "https://broker.internal:443")]));
        assert_eq!(config.endpoint, "https://broker.internal:443");
        assert!(!config.is_plaintext());
    }

    #[test]
    fn test_skip_verify_is_default() {
        assert_eq!(BridgeConfig::default().tls, TlsPolicy::SkipVerification);
        assert_eq!(BridgeConfig::new("p1", "t1").tls, TlsPolicy::SkipVerification);

        for raw in ["true", "TRUE", "1", "yes", "on", "maybe"] {
            let config = BridgeConfig::from_lookup(lookup(&[(TLS_SKIP_VERIFY_VAR, raw)]));
            assert_eq!(config.tls, TlsPolicy::SkipVerification, "value {}", raw);
        }
    }

    #[test]
    fn test_verification_opt_in() {
        for raw in ["false", "FALSE", "0", "no", "off"] {
            let config = BridgeConfig::from_lookup(lookup(&[(TLS_SKIP_VERIFY_VAR, raw)]));
            assert_eq!(config.tls, TlsPolicy::Verify, "value {}", raw);
        }
    }

    #[test]
    fn test_publish_timeout_parsing() {
        let config = BridgeConfig::from_lookup(lookup(&[(PUBLISH_TIMEOUT_VAR, "5")]));
        assert_eq!(config.publish_timeout, Duration::from_secs(5));

        for raw in ["0", "-1", "soon"] {
            let config = BridgeConfig::from_lookup(lookup(&[(PUBLISH_TIMEOUT_VAR, raw)]));
            assert_eq!(config.publish_timeout, DEFAULT_PUBLISH_TIMEOUT);
        }
    }

    #[test]
    fn test_access_token_not_serialized() {
        let config = BridgeConfig::from_lookup(lookup(&[
            (PROJECT_ID_VAR, "p1"),
            (ACCESS_TOKEN_VAR, "ya29.secret"),
        ]));
        assert_eq!(config.access_token.as_deref(), Some("ya29.secret"));

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("ya29.secret"));
        assert!(json.contains("\"tls\":\"skip_verification\""));
    }
}
