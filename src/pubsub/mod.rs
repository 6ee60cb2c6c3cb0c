//! GCP Pub/Sub publish client.
//!
//! This module implements the publishing side of Google Cloud Pub/Sub:
//! - Protocol Buffer messages for the Publish RPC
//! - Application Default Credentials for request authentication
//! - TLS credential construction with an explicit verification policy
//! - A connector seam with a tonic gRPC implementation
//! - A deadline-bounded publisher

pub mod auth;
pub mod client;
pub mod proto;
pub mod publisher;
pub mod tls;
pub mod types;

pub use auth::Authentication;
pub use client::{BrokerConnector, BrokerSession, ConnectOptions, GrpcConnector};
pub use publisher::Publisher;
pub use types::*;
