//! Protocol Buffer messages for the `google.pubsub.v1.Publisher/Publish` RPC.
//!
//! Field numbers and types follow `google/pubsub/v1/pubsub.proto`; only the
//! messages the publish call needs are declared.

use std::collections::HashMap;

/// Path of the unary publish method.
pub const PUBLISH_PATH: &str = "/google.pubsub.v1.Publisher/Publish";

/// A message that is published by publishers and consumed by subscribers.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PubsubMessage {
    /// The message data field.
    #[prost(bytes = "vec", tag = "1")]
    pub data: Vec<u8>,
    /// Attributes for this message.
    #[prost(map = "string, string", tag = "2")]
    pub attributes: HashMap<String, String>,
    /// ID of this message, assigned by the server when published.
    #[prost(string, tag = "3")]
    pub message_id: String,
    /// The time at which the message was published, set by the server.
    #[prost(message, optional, tag = "4")]
    pub publish_time: Option<::prost_types::Timestamp>,
    /// Messages with the same non-empty ordering key are delivered in order.
    #[prost(string, tag = "5")]
    pub ordering_key: String,
}

/// Request for the Publish method.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PublishRequest {
    /// The messages in the request will be published on this topic.
    /// Format is `projects/{project}/topics/{topic}`.
    #[prost(string, tag = "1")]
    pub topic: String,
    /// The messages to publish.
    #[prost(message, repeated, tag = "2")]
    pub messages: Vec<PubsubMessage>,
}

/// Response for the Publish method.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PublishResponse {
    /// The server-assigned ID of each published message, in request order.
    #[prost(string, repeated, tag = "1")]
    pub message_ids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use prost::Message;

    #[test]
    fn test_publish_request_wire_layout() {
        let request = PublishRequest {
            topic: "projects/p1/topics/t1".to_string(),
            messages: vec![PubsubMessage {
                data: b"hello".to_vec(),
                ..Default::default()
            }],
        };

        let bytes = request.encode_to_vec();
        // field 1 (topic), length-delimited
        assert_eq!(bytes[0], 0x0a);
        assert_eq!(bytes[1] as usize, "projects/p1/topics/t1".len());

        let decoded = PublishRequest::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded.messages[0].data, b"hello");
        assert!(decoded.messages[0].message_id.is_empty());
    }

    #[test]
    fn test_publish_response_decodes_ids() {
        // field 1, length 3, "m-1"
        let bytes = [0x0a, 0x03, b'm', b'-', b'1'];
        let response = PublishResponse::decode(&bytes[..]).unwrap();
        assert_eq!(response.message_ids, vec!["m-1".to_string()]);
    }
}
