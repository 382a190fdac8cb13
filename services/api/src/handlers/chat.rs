//! `GET /ws`: real-time channel.
//!
//! Each socket registers with the relay on open and unregisters on close. Every
//! inbound text or binary frame is published to all registered connections,
//! the sender's own included. Control frames are handled by axum.

use std::fmt::Display;
use std::future::Future;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::stream::StreamExt;
use futures::{Sink, SinkExt, Stream};

use crate::relay::broadcast::{BroadcastRelay, Payload};
use crate::relay::registry::ConnectionId;
use crate::state::AppState;

pub async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(state.relay, socket))
}

async fn handle_socket(relay: BroadcastRelay, socket: WebSocket) {
    let (ws_tx, ws_rx) = socket.split();
    relay_connection(relay, ConnectionId::new(), ws_tx, ws_rx).await;
}

fn into_message(payload: Payload) -> Message {
    match payload {
        Payload::Text(text) => Message::Text(text.as_ref().into()),
        Payload::Binary(bytes) => Message::Binary(bytes),
    }
}

fn into_payload(message: Message) -> Option<Payload> {
    match message {
        Message::Text(text) => Some(Payload::from(text.as_str())),
        Message::Binary(bytes) => Some(Payload::Binary(bytes)),
        _ => None,
    }
}

/// Register `id` immediately, then pump frames until either side closes.
///
/// Relayed payloads are drained from the mailbox into `sink`; frames read
/// from `stream` are published. The connection is unregistered when the peer
/// closes, the read side fails, the write side fails or the mailbox is closed
/// by a re-registration.
pub(crate) fn relay_connection<S, R, E>(
    relay: BroadcastRelay,
    id: ConnectionId,
    mut sink: S,
    mut stream: R,
) -> impl Future<Output = ()>
where
    S: Sink<Message> + Unpin,
    R: Stream<Item = Result<Message, E>> + Unpin,
    E: Display,
{
    let mut mailbox = relay.registry().register(id);
    tracing::info!(connection_id = %id, active = relay.registry().len(), "client connected");

    async move {
        loop {
            tokio::select! {
                payload = mailbox.recv() => {
                    let Some(payload) = payload else {
                        break;
                    };
                    if sink.send(into_message(payload)).await.is_err() {
                        tracing::debug!(connection_id = %id, "socket write failed");
                        break;
                    }
                }

                msg = stream.next() => {
                    match msg {
                        Some(Ok(Message::Close(_))) | None => break,
                        Some(Err(e)) => {
                            tracing::debug!(connection_id = %id, error = %e, "socket read failed");
                            break;
                        }
                        Some(Ok(message)) => {
                            if let Some(payload) = into_payload(message) {
                                relay.publish(id, payload);
                            }
                        }
                    }
                }
            }
        }

        relay.registry().unregister(id);
        tracing::info!(connection_id = %id, active = relay.registry().len(), "client disconnected");
    }
}
