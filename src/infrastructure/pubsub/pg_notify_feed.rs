use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use sqlx::postgres::PgListener;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::application::ports::{ChangeFeed, FeedError, FeedMessage, FeedStream};
use crate::domain::value_objects::ChannelTopic;

const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Change feed over Postgres `LISTEN`/`NOTIFY`.
///
/// Each subscription owns a dedicated listener connection. Notifications
/// from one connection arrive in commit order, across all its channels.
pub struct PgNotifyFeed {
    pool: PgPool,
}

impl PgNotifyFeed {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChangeFeed for PgNotifyFeed {
    async fn subscribe(&self, topics: &[ChannelTopic]) -> Result<FeedStream, FeedError> {
        let mut listener = PgListener::connect_with(&self.pool)
            .await
            .map_err(|e| FeedError::Connection(e.to_string()))?;

        let names: Vec<&str> = topics.iter().map(ChannelTopic::as_str).collect();
        listener
            .listen_all(names.iter().copied())
            .await
            .map_err(|e| FeedError::Subscribe {
                topic: names.join(","),
                reason: e.to_string(),
            })?;

        info!(topics = ?names, "Listening for change notifications");

        let stream = stream::unfold(listener, |mut listener| async move {
            loop {
                match listener.recv().await {
                    Ok(notification) => {
                        let message = FeedMessage {
                            topic: notification.channel().to_string(),
                            payload: notification.payload().as_bytes().to_vec(),
                        };
                        return Some((message, listener));
                    }
                    Err(e) => {
                        // The listener reconnects on the next recv; anything
                        // published in between is lost.
                        warn!(error = %e, "Change notification connection lost, reconnecting");
                        tokio::time::sleep(RECONNECT_DELAY).await;
                    }
                }
            }
        });

        Ok(stream.boxed())
    }
}
