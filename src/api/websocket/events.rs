//! WebSocket wire schemas
//!
//! Event names and field names are part of the wire contract and match the
//! original protocol exactly (`join-room`, `draw-event`, `blueprint-update`,
//! `draw-error`, `ticket-update`, and the `fromSpring` echo tag). Payloads
//! are explicit tagged schemas validated by serde at the boundary before
//! anything reaches the relay state machine.

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// Messages a client may send over the persistent connection
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Join a fan-out room (channel-flavor sessions)
    #[serde(rename = "join-room")]
    JoinRoom { room: String },

    /// Subscribe to a topic destination (topic-flavor sessions)
    #[serde(rename = "subscribe")]
    Subscribe { destination: String },

    /// A drawing mutation, or a backend echo of one.
    ///
    /// Echo events (`fromSpring: true`) may omit point/author/name; a
    /// point-less echo targets the ticket board.
    #[serde(rename = "draw-event")]
    DrawEvent(DrawEvent),

    /// Request creation of a new ticket on the shared queue
    #[serde(rename = "ticket-event")]
    TicketEvent {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        room: Option<String>,
    },

    /// Heartbeat
    #[serde(rename = "ping")]
    Ping,
}

/// Payload of a `draw-event`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DrawEvent {
    /// Target room. Optional: the relay can derive it from author + name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<Point>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Set on events the backend emits as confirmation of writes accepted
    /// through its own REST surface. Echoes are broadcast without being
    /// forwarded again, which is what breaks the relay loop.
    #[serde(rename = "fromSpring", default, skip_serializing_if = "Option::is_none")]
    pub from_backend: Option<bool>,
}

impl DrawEvent {
    /// Whether this event is a backend echo
    pub fn is_echo(&self) -> bool {
        self.from_backend == Some(true)
    }
}

/// Messages the relay sends to clients
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Session established
    #[serde(rename = "connected")]
    Connected { timestamp: i64 },

    /// New accepted points for a blueprint
    #[serde(rename = "blueprint-update")]
    BlueprintUpdate {
        author: String,
        name: String,
        points: Vec<Point>,
    },

    /// A mutation was rejected; sent to the originator only
    #[serde(rename = "draw-error")]
    DrawError { status: u16, body: String },

    /// The ticket board changed
    #[serde(rename = "ticket-update")]
    TicketUpdate { message: String },

    /// Heartbeat answer
    #[serde(rename = "pong")]
    Pong,
}

impl ServerMessage {
    /// Welcome frame sent when a connection is established
    pub fn connected_now() -> Self {
        Self::Connected {
            timestamp: chrono::Utc::now().timestamp(),
        }
    }

    /// Update carrying a single freshly accepted point
    pub fn single_point_update(author: &str, name: &str, point: Point) -> Self {
        Self::BlueprintUpdate {
            author: author.to_string(),
            name: name.to_string(),
            points: vec![point],
        }
    }
}
