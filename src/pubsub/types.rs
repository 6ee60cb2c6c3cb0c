//! Types shared by the publish path.

use std::fmt;

/// Broker-assigned identifier of a published message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(pub String);

impl MessageId {
    /// Create a message ID from its string form.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An owned, uninterpreted payload waiting to be published.
///
/// Always holds its own copy of the bytes so it never borrows from memory
/// owned by a foreign caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    data: Vec<u8>,
}

impl OutboundMessage {
    /// Wrap an owned payload.
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    /// Payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume the message, returning its payload.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl From<&[u8]> for OutboundMessage {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

impl From<&str> for OutboundMessage {
    fn from(data: &str) -> Self {
        Self::new(data.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for OutboundMessage {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

/// Topic resource name: `projects/{project}/topics/{topic}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicName {
    project: String,
    topic: String,
}

impl TopicName {
    /// Build a topic name from its parts.
    pub fn new(project: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            topic: topic.into(),
        }
    }

    /// Project the topic belongs to.
    pub fn project(&self) -> &str {
        &self.project
    }

    /// Topic ID within the project.
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl fmt::Display for TopicName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "projects/{}/topics/{}", self.project, self.topic)
    }
}
