//! Broker connection seam and its gRPC implementation.
//!
//! A [`BrokerConnector`] opens one [`BrokerSession`] per publish attempt. The
//! session owns the underlying channel, so dropping it closes the connection.

use crate::config::{BridgeConfig, TlsPolicy};
use crate::error::{Error, Result};
use crate::pubsub::auth::Authentication;
use crate::pubsub::proto::{PublishRequest, PublishResponse, PubsubMessage, PUBLISH_PATH};
use crate::pubsub::tls;
use crate::pubsub::types::{MessageId, OutboundMessage};
use async_trait::async_trait;
use hyper_util::client::legacy::connect::HttpConnector;
use tonic::codec::ProstCodec;
use tonic::codegen::http::uri::PathAndQuery;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::transport::{Channel, Endpoint};
use tracing::debug;

/// Connection parameters for one publish attempt.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    /// Broker endpoint URI.
    pub endpoint: String,
    /// Project the connection is scoped to.
    pub project_id: String,
    /// Certificate verification policy.
    pub tls: TlsPolicy,
    /// How requests are authenticated.
    pub auth: Authentication,
}

impl ConnectOptions {
    /// Derive connection parameters from a bridge configuration.
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            project_id: config.project_id.clone(),
            tls: config.tls,
            auth: Authentication::from_config(config),
        }
    }
}

/// Opens sessions against a Pub/Sub broker.
#[async_trait]
pub trait BrokerConnector: Send + Sync {
    /// Open a new session. Failures map to [`Error::ClientInit`].
    async fn connect(&self, options: &ConnectOptions) -> Result<Box<dyn BrokerSession>>;
}

/// An open connection to the broker.
#[async_trait]
pub trait BrokerSession: Send {
    /// Publish one message to a fully-qualified topic and wait for its ID.
    async fn publish(&mut self, topic: &str, message: OutboundMessage) -> Result<MessageId>;
}

/// Connector speaking gRPC over HTTP/2, with rustls for `https` endpoints.
#[derive(Debug, Clone, Default)]
pub struct GrpcConnector;

impl GrpcConnector {
    /// Create a new gRPC connector.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BrokerConnector for GrpcConnector {
    async fn connect(&self, options: &ConnectOptions) -> Result<Box<dyn BrokerSession>> {
        let endpoint = Endpoint::from_shared(options.endpoint.clone())
            .map_err(|e| Error::Config(format!("Invalid endpoint {}: {}", options.endpoint, e)))?;

        let tls_config = tls::client_config(options.tls)?;
        let access_token = options.auth.bearer_token().await?;

        let mut http = HttpConnector::new();
        http.enforce_http(false);
        http.set_nodelay(true);

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http2()
            .wrap_connector(http);

        debug!(
            "Connecting to {} for project {}",
            options.endpoint, options.project_id
        );

        let channel = endpoint
            .connect_with_connector(connector)
            .await
            .map_err(|e| Error::ClientInit(format!("{}: {}", options.endpoint, error_chain(&e))))?;

        Ok(Box::new(GrpcSession {
            client: tonic::client::Grpc::new(channel),
            access_token,
        }))
    }
}

/// Session over a tonic channel.
pub struct GrpcSession {
    client: tonic::client::Grpc<Channel>,
    access_token: Option<String>,
}

#[async_trait]
impl BrokerSession for GrpcSession {
    async fn publish(&mut self, topic: &str, message: OutboundMessage) -> Result<MessageId> {
        self.client
            .ready()
            .await
            .map_err(|e| Error::Publish(format!("Service was not ready: {}", error_chain(&e))))?;

        let body = PublishRequest {
            topic: topic.to_string(),
            messages: vec![PubsubMessage {
                data: message.into_data(),
                ..Default::default()
            }],
        };

        let mut request = tonic::Request::new(body);
        let params: MetadataValue<Ascii> = MetadataValue::try_from(format!("topic={}", topic))
            .map_err(|e| Error::Publish(format!("Invalid topic metadata: {}", e)))?;
        request.metadata_mut().insert("x-goog-request-params", params);

        if let Some(token) = &self.access_token {
            let value: MetadataValue<Ascii> = MetadataValue::try_from(format!("Bearer {}", token))
                .map_err(|e| Error::ClientInit(format!("Invalid access token: {}", e)))?;
            request.metadata_mut().insert("authorization", value);
        }

        let codec: ProstCodec<PublishRequest, PublishResponse> = ProstCodec::default();
        let path = PathAndQuery::from_static(PUBLISH_PATH);
        let response = self.client.unary(request, path, codec).await?;

        response
            .into_inner()
            .message_ids
            .into_iter()
            .next()
            .map(MessageId)
            .ok_or_else(|| Error::Publish("Broker returned no message ID".to_string()))
    }
}

/// Render an error with its source chain; tonic transport errors hide the
/// useful cause (e.g. "connection refused") in `source()`.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
