use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        ConnectInfo, State,
    },
    response::Response,
};
use tracing::debug;

use crate::application::notifications::SocketNamespace;

/// GET /v1/{resource}/socket
///
/// The upgrade is always accepted; admission is decided on the open socket.
/// A refused socket is closed before it is subscribed and receives nothing.
pub async fn socket_handler(
    ws: WebSocketUpgrade,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(namespace): State<Arc<SocketNamespace>>,
) -> Response {
    ws.on_upgrade(move |socket| serve_socket(socket, addr.ip(), namespace))
}

async fn serve_socket(mut socket: WebSocket, ip: IpAddr, namespace: Arc<SocketNamespace>) {
    let Some(slot) = namespace.admission().reserve(ip) else {
        let _ = socket.send(Message::Close(None)).await;
        return;
    };

    let mut subscription = namespace.attach(slot);

    loop {
        tokio::select! {
            outbound = subscription.recv() => {
                let Some(text) = outbound else { break };
                if socket.send(Message::Text(text.as_ref().into())).await.is_err() {
                    break;
                }
            }
            inbound = socket.recv() => {
                match inbound {
                    // Clients send no commands.
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    debug!(
        namespace = namespace.name(),
        socket_id = %subscription.id(),
        %ip,
        "Socket disconnected"
    );
}
