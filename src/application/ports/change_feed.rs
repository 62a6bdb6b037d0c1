use async_trait::async_trait;
use futures_util::stream::BoxStream;
use thiserror::Error;

use crate::domain::value_objects::ChannelTopic;
#[cfg(test)]
use mockall::automock;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Change feed connection failed: {0}")]
    Connection(String),

    #[error("Subscribing to {topic} failed: {reason}")]
    Subscribe { topic: String, reason: String },
}

/// One message received from the change-event transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMessage {
    pub topic: String,
    pub payload: Vec<u8>,
}

pub type FeedStream = BoxStream<'static, FeedMessage>;

/// Topic-scoped pub/sub transport. Delivery is ordered within a topic and
/// across all topics of one subscription.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Subscribe to every topic in `topics` through a single handle. The
    /// stream ends when the transport shuts down.
    async fn subscribe(&self, topics: &[ChannelTopic]) -> Result<FeedStream, FeedError>;
}
