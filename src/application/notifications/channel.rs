//! Per-resource notification channel.
//!
//! One subscription covers the resource topic and the reader's fork topic, so
//! record and fork events land in a single ordered queue. A single worker
//! drains that queue: the re-fetch and emit for one event completes before the
//! next event is looked at.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::messages::ServerMessage;
use super::namespace::SocketNamespace;
use crate::application::ports::{ChangeFeed, FeedError, FeedMessage, FeedStream, RepositoryError};
use crate::domain::entities::{ChangeEvent, ForkEvent};
use crate::domain::value_objects::ChannelTopic;

/// Result of handling one record event.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerOutcome {
    Emit(ServerMessage),
    /// The referenced entity no longer resolves
    Missing(i64),
    /// Action kind without a public message
    Ignored,
    /// Event lacks the identifier the handler needs
    Malformed(String),
}

/// Resource-specific half of a channel: re-fetch and message mapping.
#[async_trait]
pub trait ChannelHandler: Send + Sync {
    async fn handle(&self, event: &ChangeEvent) -> Result<HandlerOutcome, RepositoryError>;
}

/// Delivery counters for one channel.
#[derive(Debug, Default)]
pub struct ChannelStats {
    received: AtomicU64,
    emitted: AtomicU64,
    forks: AtomicU64,
    ignored: AtomicU64,
    dropped_missing: AtomicU64,
    dropped_malformed: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChannelStatsSnapshot {
    pub received: u64,
    pub emitted: u64,
    pub forks: u64,
    pub ignored: u64,
    pub dropped_missing: u64,
    pub dropped_malformed: u64,
    pub failed: u64,
}

impl ChannelStats {
    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ChannelStatsSnapshot {
        ChannelStatsSnapshot {
            received: self.received.load(Ordering::Relaxed),
            emitted: self.emitted.load(Ordering::Relaxed),
            forks: self.forks.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            dropped_missing: self.dropped_missing.load(Ordering::Relaxed),
            dropped_malformed: self.dropped_malformed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

pub struct NotificationChannel {
    topic: ChannelTopic,
    fork_topic: ChannelTopic,
    namespace: Arc<SocketNamespace>,
    handler: Arc<dyn ChannelHandler>,
    queue_capacity: usize,
}

impl NotificationChannel {
    pub fn new(
        topic: ChannelTopic,
        fork_topic: ChannelTopic,
        namespace: Arc<SocketNamespace>,
        handler: Arc<dyn ChannelHandler>,
        queue_capacity: usize,
    ) -> Self {
        Self {
            topic,
            fork_topic,
            namespace,
            handler,
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Subscribe and spawn the pump and worker tasks.
    pub async fn start(self, feed: &dyn ChangeFeed) -> Result<ChannelHandle, FeedError> {
        let stream = feed
            .subscribe(&[self.topic.clone(), self.fork_topic.clone()])
            .await?;

        let stats = Arc::new(ChannelStats::default());
        let (sender, receiver) = mpsc::channel(self.queue_capacity);

        info!(
            topic = %self.topic,
            fork_topic = %self.fork_topic,
            namespace = self.namespace.name(),
            capacity = self.queue_capacity,
            "Notification channel started"
        );

        let pump = tokio::spawn(pump(stream, sender, self.topic.clone(), Arc::clone(&stats)));

        let worker = Worker {
            topic: self.topic.clone(),
            fork_topic: self.fork_topic,
            namespace: self.namespace,
            handler: self.handler,
            stats: Arc::clone(&stats),
        };
        let worker = tokio::spawn(worker.run(receiver));

        Ok(ChannelHandle {
            topic: self.topic,
            stats,
            pump,
            worker,
        })
    }
}

/// Moves transport messages into the bounded queue. Waits for free capacity
/// instead of dropping.
async fn pump(
    mut stream: FeedStream,
    sender: mpsc::Sender<FeedMessage>,
    topic: ChannelTopic,
    stats: Arc<ChannelStats>,
) {
    while let Some(message) = stream.next().await {
        ChannelStats::bump(&stats.received);

        if sender.capacity() == 0 {
            warn!(topic = %topic, "Notification queue full, waiting for worker");
        }

        if sender.send(message).await.is_err() {
            break;
        }
    }

    info!(topic = %topic, "Change feed subscription ended");
}

struct Worker {
    topic: ChannelTopic,
    fork_topic: ChannelTopic,
    namespace: Arc<SocketNamespace>,
    handler: Arc<dyn ChannelHandler>,
    stats: Arc<ChannelStats>,
}

impl Worker {
    async fn run(self, mut receiver: mpsc::Receiver<FeedMessage>) {
        while let Some(message) = receiver.recv().await {
            self.process(message).await;
        }
    }

    async fn process(&self, message: FeedMessage) {
        if message.topic == self.fork_topic.as_str() {
            self.process_fork(&message.payload);
            return;
        }

        let event: ChangeEvent = match serde_json::from_slice(&message.payload) {
            Ok(event) => event,
            Err(e) => {
                ChannelStats::bump(&self.stats.dropped_malformed);
                warn!(topic = %self.topic, error = %e, "Dropping undecodable change event");
                return;
            }
        };

        match self.handler.handle(&event).await {
            Ok(HandlerOutcome::Emit(message)) => {
                let delivered = self.namespace.broadcast(&message);
                ChannelStats::bump(&self.stats.emitted);
                debug!(topic = %self.topic, event = %message.event, delivered, "Emitted change event");
            }
            Ok(HandlerOutcome::Missing(id)) => {
                ChannelStats::bump(&self.stats.dropped_missing);
                warn!(
                    topic = %self.topic,
                    action = %event.action,
                    id,
                    block_num = event.block.as_ref().map(|b| b.block_num),
                    "Change event references an entity that does not resolve"
                );
            }
            Ok(HandlerOutcome::Ignored) => {
                ChannelStats::bump(&self.stats.ignored);
                debug!(topic = %self.topic, action = %event.action, "Ignoring change event");
            }
            Ok(HandlerOutcome::Malformed(reason)) => {
                ChannelStats::bump(&self.stats.dropped_malformed);
                warn!(topic = %self.topic, action = %event.action, reason = %reason, "Dropping malformed change event");
            }
            Err(e) => {
                ChannelStats::bump(&self.stats.failed);
                error!(topic = %self.topic, action = %event.action, error = %e, "Failed to resolve change event");
            }
        }
    }

    fn process_fork(&self, payload: &[u8]) {
        match serde_json::from_slice::<ForkEvent>(payload) {
            Ok(fork) => {
                let delivered = self.namespace.broadcast(&ServerMessage::fork(fork));
                ChannelStats::bump(&self.stats.forks);
                info!(topic = %self.topic, block_num = fork.block_num, delivered, "Fork broadcast");
            }
            Err(e) => {
                ChannelStats::bump(&self.stats.dropped_malformed);
                warn!(topic = %self.fork_topic, error = %e, "Dropping undecodable fork event");
            }
        }
    }
}

/// Running channel.
pub struct ChannelHandle {
    topic: ChannelTopic,
    stats: Arc<ChannelStats>,
    pump: JoinHandle<()>,
    worker: JoinHandle<()>,
}

impl ChannelHandle {
    pub fn topic(&self) -> &ChannelTopic {
        &self.topic
    }

    pub fn stats(&self) -> ChannelStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn is_running(&self) -> bool {
        !self.worker.is_finished()
    }

    /// Wait until every queued event has been processed. Completes once the
    /// feed stream has ended.
    pub async fn drain(self) {
        let _ = self.pump.await;
        let _ = self.worker.await;
    }

    /// Stop consuming the feed. Queued events are discarded.
    pub fn shutdown(&self) {
        self.pump.abort();
        self.worker.abort();
    }
}
