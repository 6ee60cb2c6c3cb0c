//! Integration tests for the gRPC connector against real sockets.

use pubsub_bridge::config::{BridgeConfig, TlsPolicy};
use pubsub_bridge::pubsub::{GrpcConnector, Publisher};
use pubsub_bridge::Error;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Start a listener that accepts connections and never answers.
async fn silent_broker() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    addr.to_string()
}

/// Get an address nothing is listening on.
async fn closed_port() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

fn config(endpoint: String, timeout: Duration) -> BridgeConfig {
    let mut config = BridgeConfig::new("p1", "t1");
    config.endpoint = endpoint;
    config.publish_timeout = timeout;
    config
}

#[tokio::test]
async fn test_silent_plaintext_broker_times_out() {
    let addr = silent_broker().await;
    let publisher = Publisher::new(
        config(format!("http://{}", addr), Duration::from_millis(500)),
        Arc::new(GrpcConnector::new()),
    );

    let result = tokio::time::timeout(Duration::from_secs(10), publisher.publish("hello".into()))
        .await
        .expect("publish did not honor its deadline");

    assert!(matches!(result, Err(Error::Timeout(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_silent_tls_broker_times_out() {
    let addr = silent_broker().await;
    let mut config = config(format!("https://{}", addr), Duration::from_millis(500));
    config.tls = TlsPolicy::SkipVerification;
    config.access_token = Some("test-token".to_string());
    let publisher = Publisher::new(config, Arc::new(GrpcConnector::new()));

    let result = tokio::time::timeout(Duration::from_secs(10), publisher.publish("hello".into()))
        .await
        .expect("publish did not honor its deadline");

    assert!(matches!(result, Err(Error::Timeout(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_connection_refused_is_client_init_error() {
    let addr = closed_port().await;
    let publisher = Publisher::new(
        config(format!("http://{}", addr), Duration::from_secs(5)),
        Arc::new(GrpcConnector::new()),
    );

    let result = publisher.publish("hello".into()).await;

    assert!(matches!(result, Err(Error::ClientInit(_))), "got {:?}", result);
}

#[tokio::test]
async fn test_missing_topic_fails_before_connecting() {
    let mut config = BridgeConfig::new("p1", "");
    config.endpoint = closed_port().await;
    let publisher = Publisher::new(config, Arc::new(GrpcConnector::new()));

    let result = publisher.publish("hello".into()).await;

    assert!(matches!(result, Err(Error::MissingConfig(_))));
}
