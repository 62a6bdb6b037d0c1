use std::collections::HashSet;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

use crate::application::ports::{ChangeFeed, FeedError, FeedMessage, FeedStream};
use crate::domain::value_objects::ChannelTopic;

struct Subscriber {
    topics: HashSet<String>,
    sender: mpsc::UnboundedSender<FeedMessage>,
}

/// In-process change feed for single-node deployments and tests.
#[derive(Default)]
pub struct MemoryChangeFeed {
    subscribers: Mutex<Vec<Subscriber>>,
}

impl MemoryChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `payload` to every subscription that includes `topic`.
    /// Returns the number of subscriptions reached.
    pub fn publish(&self, topic: &ChannelTopic, payload: impl Into<Vec<u8>>) -> usize {
        let payload = payload.into();
        let mut subscribers = self.subscribers.lock();

        subscribers.retain(|s| !s.sender.is_closed());

        let mut delivered = 0;
        for subscriber in subscribers.iter().filter(|s| s.topics.contains(topic.as_str())) {
            let message = FeedMessage {
                topic: topic.to_string(),
                payload: payload.clone(),
            };
            if subscriber.sender.send(message).is_ok() {
                delivered += 1;
            }
        }

        debug!(topic = %topic, delivered, "Published change event");
        delivered
    }

    /// End every open subscription stream.
    pub fn close(&self) {
        self.subscribers.lock().clear();
    }
}

#[async_trait]
impl ChangeFeed for MemoryChangeFeed {
    async fn subscribe(&self, topics: &[ChannelTopic]) -> Result<FeedStream, FeedError> {
        let (sender, receiver) = mpsc::unbounded_channel();

        self.subscribers.lock().push(Subscriber {
            topics: topics.iter().map(|t| t.as_str().to_string()).collect(),
            sender,
        });

        let stream = stream::unfold(receiver, |mut receiver| async move {
            receiver.recv().await.map(|message| (message, receiver))
        });

        Ok(stream.boxed())
    }
}
