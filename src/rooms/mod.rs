//! Room registry
//!
//! Maps a logical room identifier to the set of live subscriber handles and
//! fans events out to them. The registry is an explicit object created at
//! service start and passed by reference to the connection-handling layer,
//! never ambient global state.
//!
//! Membership is ephemeral: a room exists while it has members and is
//! dropped once the last handle leaves. Delivery is best-effort per
//! connection; a handle that is gone at broadcast time never receives the
//! event, and there is no offline queueing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::debug;

use crate::api::websocket::events::ServerMessage;

/// Identifier for one live connection
pub type ConnectionId = u64;

/// One outbound delivery: the message plus the room it was broadcast to.
///
/// `room` is the room the broadcast actually targeted, which can differ
/// from the canonical room implied by the payload when the event carried a
/// custom room hint. Direct originator-only frames have no room.
#[derive(Debug, Clone)]
pub struct Outbound {
    pub room: Option<String>,
    pub message: ServerMessage,
}

/// Outbound sender half for one connection
pub type OutboundTx = mpsc::UnboundedSender<Outbound>;

/// Handle to one live connection, usable for direct (originator-only) sends
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub id: ConnectionId,
    tx: OutboundTx,
}

impl ConnectionHandle {
    /// Send a message to this connection only. Best-effort: a closed
    /// connection drops the message.
    pub fn send(&self, msg: ServerMessage) {
        let _ = self.tx.send(Outbound {
            room: None,
            message: msg,
        });
    }
}

/// Registry of rooms and their live members
pub struct RoomRegistry {
    // room id -> member id -> outbound sender
    rooms: RwLock<HashMap<String, HashMap<ConnectionId, OutboundTx>>>,
    next_id: AtomicU64,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new connection. Returns its handle and the receiver half
    /// the connection's writer task drains.
    pub fn register(&self) -> (ConnectionHandle, mpsc::UnboundedReceiver<Outbound>) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel();
        (ConnectionHandle { id, tx }, rx)
    }

    /// Join a connection to a room. Idempotent: re-joining replaces the
    /// existing entry for the same connection.
    pub fn join(&self, room: &str, handle: &ConnectionHandle) {
        let mut rooms = self.rooms.write();
        rooms
            .entry(room.to_string())
            .or_default()
            .insert(handle.id, handle.tx.clone());
        debug!(room, connection = handle.id, "join-room");
    }

    /// Remove a connection from every room it joined. Called unconditionally
    /// on disconnect; empty rooms are dropped.
    pub fn leave_all(&self, id: ConnectionId) {
        let mut rooms = self.rooms.write();
        rooms.retain(|_, members| {
            members.remove(&id);
            !members.is_empty()
        });
    }

    /// Deliver a message to every current member of the room, including the
    /// sender if the sender is a member. Each delivery carries the target
    /// room so the transport layer can label the frame correctly. Returns
    /// the number of handles the message was handed to. Closed handles are
    /// pruned on the way.
    pub fn broadcast(&self, room: &str, msg: &ServerMessage) -> usize {
        let mut rooms = self.rooms.write();
        let Some(members) = rooms.get_mut(room) else {
            return 0;
        };

        let mut delivered = 0;
        members.retain(|_, tx| {
            let out = Outbound {
                room: Some(room.to_string()),
                message: msg.clone(),
            };
            if tx.send(out).is_ok() {
                delivered += 1;
                true
            } else {
                false
            }
        });
        if members.is_empty() {
            rooms.remove(room);
        }
        delivered
    }

    /// Number of members currently joined to a room
    pub fn member_count(&self, room: &str) -> usize {
        self.rooms.read().get(room).map_or(0, HashMap::len)
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
