use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::{debug, error};
use uuid::Uuid;

use super::admission::{ConnectionAdmission, ConnectionSlot};
use super::messages::ServerMessage;

type Outbound = mpsc::UnboundedSender<Arc<str>>;

/// Set of sockets subscribed to one resource path.
///
/// Each socket owns an unbounded outbound queue, so a slow reader never
/// holds up delivery to the others.
pub struct SocketNamespace {
    name: String,
    admission: Arc<ConnectionAdmission>,
    sockets: DashMap<Uuid, Outbound>,
}

impl SocketNamespace {
    pub fn new(name: impl Into<String>, admission: Arc<ConnectionAdmission>) -> Arc<Self> {
        Arc::new(Self {
            name: name.into(),
            admission,
            sockets: DashMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn admission(&self) -> &Arc<ConnectionAdmission> {
        &self.admission
    }

    pub fn connected(&self) -> usize {
        self.sockets.len()
    }

    /// Subscribe a socket that holds a granted slot. The slot is released
    /// when the returned subscription is dropped.
    pub fn attach(self: &Arc<Self>, slot: ConnectionSlot) -> Subscription {
        let id = Uuid::new_v4();
        let (sender, receiver) = mpsc::unbounded_channel();
        self.sockets.insert(id, sender);

        debug!(namespace = %self.name, socket_id = %id, ip = %slot.ip(), "Socket subscribed");

        Subscription {
            id,
            namespace: Arc::clone(self),
            receiver,
            _slot: slot,
        }
    }

    /// Queue `message` for every subscribed socket. Returns the number of
    /// sockets it was queued for.
    pub fn broadcast(&self, message: &ServerMessage) -> usize {
        let text: Arc<str> = match message.to_text() {
            Ok(text) => text.into(),
            Err(e) => {
                error!(namespace = %self.name, event = %message.event, error = %e, "Failed to encode socket message");
                return 0;
            }
        };

        let mut delivered = 0;
        let mut closed = Vec::new();

        for entry in self.sockets.iter() {
            if entry.value().send(Arc::clone(&text)).is_ok() {
                delivered += 1;
            } else {
                closed.push(*entry.key());
            }
        }

        for id in closed {
            self.detach(id);
        }

        delivered
    }

    fn detach(&self, id: Uuid) {
        if self.sockets.remove(&id).is_some() {
            debug!(namespace = %self.name, socket_id = %id, "Socket unsubscribed");
        }
    }
}

/// A subscribed socket's receiving end.
pub struct Subscription {
    id: Uuid,
    namespace: Arc<SocketNamespace>,
    receiver: mpsc::UnboundedReceiver<Arc<str>>,
    _slot: ConnectionSlot,
}

impl Subscription {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Next outbound frame; `None` once the namespace is gone.
    pub async fn recv(&mut self) -> Option<Arc<str>> {
        self.receiver.recv().await
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.namespace.detach(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::net::IpAddr;

    fn namespace(max: usize) -> Arc<SocketNamespace> {
        SocketNamespace::new("/v1/assets", ConnectionAdmission::new(max, max))
    }

    fn slot(ns: &SocketNamespace) -> ConnectionSlot {
        ns.admission()
            .reserve(IpAddr::from([127, 0, 0, 1]))
            .unwrap()
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_subscribers() {
        let ns = namespace(10);
        let mut a = ns.attach(slot(&ns));
        let mut b = ns.attach(slot(&ns));

        let delivered = ns.broadcast(&ServerMessage::new("burn", json!({"asset": 1})));

        assert_eq!(delivered, 2);
        assert_eq!(&*a.recv().await.unwrap(), r#"{"event":"burn","data":{"asset":1}}"#);
        assert!(b.recv().await.is_some());
    }

    #[tokio::test]
    async fn test_drop_detaches_and_releases() {
        let ns = namespace(1);
        let sub = ns.attach(slot(&ns));

        assert_eq!(ns.connected(), 1);
        assert!(ns.admission().reserve(IpAddr::from([127, 0, 0, 2])).is_none());

        drop(sub);

        assert_eq!(ns.connected(), 0);
        assert_eq!(ns.admission().active(), 0);
        assert_eq!(ns.broadcast(&ServerMessage::new("burn", json!({}))), 0);
    }
}
