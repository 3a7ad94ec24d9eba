//! WebSocket connection handler
//!
//! One task per connection reads inbound frames and processes each to
//! completion, including any nested backend calls, before the next frame
//! from the same connection is touched. A separate writer task drains the
//! connection's outbound channel, so broadcasts from other connections
//! buffer instead of blocking while an event is mid-flight.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::events::{ClientMessage, ServerMessage};
use super::state::AppState;
use crate::rooms::ConnectionHandle;
use crate::transport::{self, TransportKind};

/// Query parameters for the WebSocket upgrade
#[derive(Debug, Deserialize)]
pub struct WsParams {
    /// Connection flavor: `channel` (default) or `topic`. Fixed for the
    /// whole session.
    pub transport: Option<String>,
}

/// WebSocket upgrade handler
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let kind = match params.transport.as_deref() {
        None => TransportKind::default(),
        Some(value) => match TransportKind::parse(value) {
            Some(kind) => kind,
            None => {
                return (StatusCode::BAD_REQUEST, "unknown transport flavor").into_response();
            }
        },
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, kind))
}

/// Handle one connection from upgrade to disconnect
async fn handle_socket(socket: WebSocket, state: Arc<AppState>, kind: TransportKind) {
    let (handle, mut outbound_rx) = state.rooms.register();
    let conn_id = handle.id;
    info!(connection = conn_id, ?kind, "socket connected");

    handle.send(ServerMessage::connected_now());

    let (mut sink, mut stream) = socket.split();

    // Writer: drains the outbound channel into the socket. Ends when the
    // channel closes (registry cleanup) or the peer stops accepting.
    let writer = tokio::spawn(async move {
        while let Some(out) = outbound_rx.recv().await {
            let text = match kind.frame(out.room.as_deref(), &out.message) {
                Ok(text) => text,
                Err(err) => {
                    warn!(connection = conn_id, error = %err, "dropping unserializable frame");
                    continue;
                }
            };
            if sink.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    // Reader: strictly serial per connection.
    while let Some(Ok(msg)) = stream.next().await {
        match msg {
            Message::Text(text) => handle_frame(&state, kind, &handle, &text).await,
            Message::Close(_) => break,
            // Binary is not part of the wire contract; control frames are
            // answered by the protocol layer.
            Message::Binary(_) | Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    // Cleanup is unconditional and does not wait for anything in flight.
    state.rooms.leave_all(conn_id);
    writer.abort();
    info!(connection = conn_id, "socket disconnected");
}

/// Process one inbound frame
async fn handle_frame(
    state: &Arc<AppState>,
    kind: TransportKind,
    handle: &ConnectionHandle,
    text: &str,
) {
    let msg: ClientMessage = match serde_json::from_str(text) {
        Ok(msg) => msg,
        Err(err) => {
            debug!(connection = handle.id, error = %err, "malformed frame");
            handle.send(ServerMessage::DrawError {
                status: 400,
                body: format!("invalid message: {}", err),
            });
            return;
        }
    };

    match msg {
        ClientMessage::JoinRoom { room } => {
            if kind != TransportKind::Channel {
                handle.send(ServerMessage::DrawError {
                    status: 400,
                    body: "join-room is not available on topic sessions".to_string(),
                });
                return;
            }
            state.rooms.join(&room, handle);
        }
        ClientMessage::Subscribe { destination } => {
            if kind != TransportKind::Topic {
                handle.send(ServerMessage::DrawError {
                    status: 400,
                    body: "subscribe is not available on channel sessions".to_string(),
                });
                return;
            }
            match transport::room_for_destination(&destination) {
                Some(room) => state.rooms.join(room, handle),
                None => handle.send(ServerMessage::DrawError {
                    status: 400,
                    body: format!("unknown destination: {}", destination),
                }),
            }
        }
        ClientMessage::DrawEvent(event) => {
            state.relay.handle_draw(event, handle).await;
        }
        ClientMessage::TicketEvent { .. } => {
            state.relay.handle_ticket(handle).await;
        }
        ClientMessage::Ping => handle.send(ServerMessage::Pong),
    }
}
