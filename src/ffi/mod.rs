//! C ABI entry points.
//!
//! `PublishMessage` is the only call a host process needs. It copies the
//! caller's string, publishes it on a private current-thread runtime and
//! reports `0` on success or `1` on any failure. Failure details go to the
//! log only.
//!
//! The process-wide [`Bridge`] is built on first use (or by
//! `PubsubBridgeInit`): the settings file is loaded, configuration is
//! resolved once, and the result is read-only from then on.

use crate::config::{load_settings, BridgeConfig, DEFAULT_SETTINGS_FILE, ENV_FILE_VAR};
use crate::error::{Error, Result};
use crate::pubsub::{BrokerConnector, GrpcConnector, MessageId, OutboundMessage, Publisher};
use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use tracing::{error, info, warn};

/// Status returned when the message was acknowledged.
pub const STATUS_OK: c_int = 0;
/// Status returned for every kind of failure.
pub const STATUS_FAILURE: c_int = 1;

static BRIDGE: OnceLock<Bridge> = OnceLock::new();

/// Resolved configuration plus the publisher built from it.
#[derive(Clone)]
pub struct Bridge {
    publisher: Publisher,
}

impl Bridge {
    /// Create a bridge from explicit configuration and connector.
    pub fn new(config: BridgeConfig, connector: Arc<dyn BrokerConnector>) -> Self {
        Self {
            publisher: Publisher::new(config, connector),
        }
    }

    /// Load the settings file, resolve configuration from the environment and
    /// connect over gRPC.
    ///
    /// A missing or unreadable settings file is logged and otherwise ignored.
    pub fn initialize() -> Self {
        let path = std::env::var(ENV_FILE_VAR).unwrap_or_else(|_| DEFAULT_SETTINGS_FILE.to_string());
        if let Err(e) = load_settings(&path) {
            warn!("Failed to load settings: {}", e);
        }

        let config = BridgeConfig::from_env();
        info!(
            project_id = %config.project_id,
            topic_id = %config.topic_id,
            endpoint = %config.endpoint,
            "Pub/Sub bridge initialized"
        );

        Self::new(config, Arc::new(GrpcConnector::new()))
    }

    /// Configuration the bridge publishes with.
    pub fn config(&self) -> &BridgeConfig {
        self.publisher.config()
    }

    /// Publisher driven by this bridge.
    pub fn publisher(&self) -> &Publisher {
        &self.publisher
    }
}

/// Process-wide bridge, initialized on first access.
pub fn global() -> &'static Bridge {
    BRIDGE.get_or_init(|| {
        init_tracing();
        Bridge::initialize()
    })
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // A host that already installed a subscriber keeps it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}

/// Publish a payload through `bridge`, blocking until the attempt finishes.
///
/// The payload is copied before anything else happens. Must not be called
/// from inside a tokio runtime.
pub fn publish_bytes(bridge: &Bridge, payload: &[u8]) -> Result<MessageId> {
    let message = OutboundMessage::from(payload);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Internal(format!("Failed to start runtime: {}", e)))?;

    runtime.block_on(bridge.publisher().publish(message))
}

/// Publish a C string through `bridge` and narrow the outcome to a status.
///
/// # Safety
///
/// `message` must be null or point to a NUL-terminated string that stays
/// valid for the duration of this call.
pub unsafe fn publish_status(bridge: &Bridge, message: *const c_char) -> c_int {
    if message.is_null() {
        error!("Failed to publish message: null message pointer");
        return STATUS_FAILURE;
    }

    // SAFETY: non-null and NUL-terminated per the caller contract; the bytes
    // are copied before this function returns.
    let payload = unsafe { CStr::from_ptr(message) }.to_bytes().to_vec();

    match publish_bytes(bridge, &payload) {
        Ok(id) => {
            info!(message_id = %id, "Message published successfully");
            STATUS_OK
        }
        Err(e) => {
            error!("Failed to publish message: {}", e);
            STATUS_FAILURE
        }
    }
}

/// Publish a NUL-terminated message to the configured topic.
///
/// Returns `0` on success and `1` on any failure.
///
/// # Safety
///
/// `message` must be null or point to a NUL-terminated string that stays
/// valid for the duration of this call.
#[no_mangle]
#[allow(non_snake_case)]
pub unsafe extern "C" fn PublishMessage(message: *const c_char) -> c_int {
    let result = catch_unwind(AssertUnwindSafe(|| {
        // SAFETY: forwarded caller contract.
        unsafe { publish_status(global(), message) }
    }));

    result.unwrap_or_else(|_| {
        eprintln!("pubsub-bridge: panic while publishing message");
        STATUS_FAILURE
    })
}

/// Initialize logging and configuration ahead of the first publish.
///
/// Idempotent. Always returns `0`; configuration problems surface on publish.
#[no_mangle]
#[allow(non_snake_case)]
pub extern "C" fn PubsubBridgeInit() -> c_int {
    match catch_unwind(|| {
        global();
    }) {
        Ok(()) => STATUS_OK,
        Err(_) => STATUS_FAILURE,
    }
}
