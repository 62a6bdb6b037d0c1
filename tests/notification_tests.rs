//! Notification channel behaviour over the in-process change feed.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use contract_state_api::application::notifications::{
    ChannelHandler, ConnectionAdmission, HandlerOutcome, NotificationChannel, ServerMessage,
    SocketNamespace, Subscription,
};
use contract_state_api::application::ports::RepositoryError;
use contract_state_api::domain::entities::ChangeEvent;
use contract_state_api::domain::value_objects::ChannelTopic;
use contract_state_api::infrastructure::pubsub::MemoryChangeFeed;

/// Echoes the event id after a delay that shrinks as ids grow, so a
/// concurrent implementation would reorder the output.
struct SlowEcho;

#[async_trait]
impl ChannelHandler for SlowEcho {
    async fn handle(&self, event: &ChangeEvent) -> Result<HandlerOutcome, RepositoryError> {
        let Some(id) = event.identifier("sale_id") else {
            return Ok(HandlerOutcome::Malformed("missing sale_id".to_string()));
        };

        tokio::time::sleep(Duration::from_millis((20 - id.min(20)) as u64)).await;

        if event.action == "fail" {
            return Err(RepositoryError::Decode("broken row".to_string()));
        }

        Ok(HandlerOutcome::Emit(ServerMessage::new(
            &event.action,
            json!({ "sale_id": id.to_string() }),
        )))
    }
}

fn topics() -> (ChannelTopic, ChannelTopic) {
    (
        ChannelTopic::resource("wax-1", "atomicmarket", "sales").unwrap(),
        ChannelTopic::fork("wax-1").unwrap(),
    )
}

fn subscribe(namespace: &Arc<SocketNamespace>, last_octet: u8) -> Subscription {
    let slot = namespace
        .admission()
        .reserve(IpAddr::from([10, 0, 0, last_octet]))
        .expect("Slot refused");
    namespace.attach(slot)
}

async fn next_frame(subscription: &mut Subscription) -> Value {
    let frame = tokio::time::timeout(Duration::from_secs(5), subscription.recv())
        .await
        .expect("Timed out waiting for frame")
        .expect("Namespace closed");
    serde_json::from_str(&frame).expect("Frame is not JSON")
}

#[tokio::test]
async fn test_events_are_emitted_in_publish_order_under_backpressure() {
    let feed = MemoryChangeFeed::new();
    let (topic, fork) = topics();
    let namespace = SocketNamespace::new("/v1/sales", ConnectionAdmission::new(10, 10));
    let mut first = subscribe(&namespace, 1);
    let mut second = subscribe(&namespace, 2);

    let handle = NotificationChannel::new(topic.clone(), fork, Arc::clone(&namespace), Arc::new(SlowEcho), 2)
        .start(&feed)
        .await
        .expect("Channel start failed");

    for id in 1..=20 {
        let reached = feed.publish(&topic, json!({"action": "lognewsale", "data": {"sale_id": id}}).to_string());
        assert_eq!(reached, 1);
    }

    for id in 1..=20 {
        let expected = id.to_string();
        assert_eq!(next_frame(&mut first).await["data"]["sale_id"], expected.as_str());
        assert_eq!(next_frame(&mut second).await["data"]["sale_id"], expected.as_str());
    }

    feed.close();
    let stats = handle.stats();
    handle.drain().await;

    assert_eq!(stats.received, 20);
    assert_eq!(stats.emitted, 20);
}

#[tokio::test]
async fn test_fork_is_delivered_between_record_events() {
    let feed = MemoryChangeFeed::new();
    let (topic, fork) = topics();
    let namespace = SocketNamespace::new("/v1/sales", ConnectionAdmission::new(10, 10));
    let mut subscription = subscribe(&namespace, 1);

    let handle = NotificationChannel::new(topic.clone(), fork.clone(), Arc::clone(&namespace), Arc::new(SlowEcho), 16)
        .start(&feed)
        .await
        .expect("Channel start failed");

    feed.publish(&topic, json!({"action": "lognewsale", "data": {"sale_id": 1}}).to_string());
    feed.publish(&fork, json!({"block_num": 4242}).to_string());
    feed.publish(&topic, json!({"action": "cancelsale", "data": {"sale_id": 2}}).to_string());

    let frames = [
        next_frame(&mut subscription).await,
        next_frame(&mut subscription).await,
        next_frame(&mut subscription).await,
    ];

    assert_eq!(frames[0]["event"], "lognewsale");
    assert_eq!(frames[1], json!({"event": "fork", "data": {"block_num": 4242}}));
    assert_eq!(frames[2]["event"], "cancelsale");

    feed.close();
    handle.drain().await;
}

#[tokio::test]
async fn test_failures_do_not_stop_the_channel() {
    let feed = MemoryChangeFeed::new();
    let (topic, fork) = topics();
    let namespace = SocketNamespace::new("/v1/sales", ConnectionAdmission::new(10, 10));
    let mut subscription = subscribe(&namespace, 1);

    let handle = NotificationChannel::new(topic.clone(), fork, Arc::clone(&namespace), Arc::new(SlowEcho), 16)
        .start(&feed)
        .await
        .expect("Channel start failed");

    feed.publish(&topic, json!({"action": "fail", "data": {"sale_id": 1}}).to_string());
    feed.publish(&topic, json!({"action": "lognewsale", "data": {}}).to_string());
    feed.publish(&topic, "{\"action\":");
    feed.publish(&topic, json!({"action": "purchasesale", "data": {"sale_id": "3"}}).to_string());

    let frame = next_frame(&mut subscription).await;
    assert_eq!(frame["event"], "purchasesale");
    assert_eq!(frame["data"]["sale_id"], "3");
    assert!(handle.is_running());

    feed.close();
    let stats = handle.stats();
    handle.drain().await;

    assert_eq!(stats.failed, 1);
    assert_eq!(stats.dropped_malformed, 2);
    assert_eq!(stats.emitted, 1);
}

#[tokio::test]
async fn test_other_topics_are_not_delivered() {
    let feed = MemoryChangeFeed::new();
    let (topic, fork) = topics();
    let other = ChannelTopic::resource("wax-1", "atomicassets", "assets").unwrap();
    let namespace = SocketNamespace::new("/v1/sales", ConnectionAdmission::new(10, 10));

    let handle = NotificationChannel::new(topic, fork, Arc::clone(&namespace), Arc::new(SlowEcho), 16)
        .start(&feed)
        .await
        .expect("Channel start failed");

    assert_eq!(feed.publish(&other, json!({"action": "mint"}).to_string()), 0);

    feed.close();
    let stats = handle.stats();
    handle.drain().await;

    assert_eq!(stats.received, 0);
}

#[tokio::test]
async fn test_shutdown_stops_consuming_the_feed() {
    let feed = MemoryChangeFeed::new();
    let (topic, fork) = topics();
    let namespace = SocketNamespace::new("/v1/sales", ConnectionAdmission::new(10, 10));

    let handle = NotificationChannel::new(topic.clone(), fork, Arc::clone(&namespace), Arc::new(SlowEcho), 16)
        .start(&feed)
        .await
        .expect("Channel start failed");
    assert!(handle.is_running());

    handle.shutdown();

    tokio::time::timeout(Duration::from_secs(5), async {
        while handle.is_running() || feed.publish(&topic, json!({"action": "lognewsale"}).to_string()) > 0 {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("Channel still running after shutdown");
}

#[tokio::test]
async fn test_admission_limits_and_release() {
    let admission = ConnectionAdmission::new(3, 2);
    let namespace = SocketNamespace::new("/v1/assets", Arc::clone(&admission));
    let ip = IpAddr::from([192, 168, 0, 1]);

    let a = namespace.attach(admission.reserve(ip).expect("first slot"));
    let _b = namespace.attach(admission.reserve(ip).expect("second slot"));
    assert!(admission.reserve(ip).is_none(), "per-address cap");

    let _c = namespace.attach(
        admission
            .reserve(IpAddr::from([192, 168, 0, 2]))
            .expect("other address"),
    );
    assert!(admission.reserve(IpAddr::from([192, 168, 0, 3])).is_none(), "total cap");
    assert_eq!(namespace.connected(), 3);

    drop(a);

    assert_eq!(namespace.connected(), 2);
    assert!(admission.reserve(ip).is_some());
}
