//! Transport abstraction
//!
//! A session speaks one of two interchangeable persistent-connection
//! flavors over the same WebSocket endpoint, chosen at upgrade time via the
//! `transport` query parameter and never mixed afterwards:
//!
//! - **channel**: publish/subscribe rooms, with `join-room` inbound and bare
//!   server messages outbound.
//! - **topic**: topic/subscription, with `subscribe` to `/topic/<room>`
//!   inbound and outbound frames wrapped with the destination they belong to.
//!
//! Both flavors feed the same relay; the mapping between destinations and
//! rooms lives here.

use serde::Serialize;

use crate::api::websocket::events::ServerMessage;

/// Prefix of broadcast destinations in the topic flavor
pub const TOPIC_PREFIX: &str = "/topic/";

/// Which connection flavor a session speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransportKind {
    #[default]
    Channel,
    Topic,
}

impl TransportKind {
    /// Parse the `transport` query parameter. Unknown values are rejected
    /// rather than silently defaulted, so a typo cannot mix flavors.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "channel" => Some(Self::Channel),
            "topic" => Some(Self::Topic),
            _ => None,
        }
    }

    /// Serialize an outbound message the way this flavor frames it
    pub fn frame(&self, room: Option<&str>, msg: &ServerMessage) -> Result<String, serde_json::Error> {
        match self {
            Self::Channel => serde_json::to_string(msg),
            Self::Topic => serde_json::to_string(&TopicFrame {
                destination: room.map(destination_for_room),
                body: msg,
            }),
        }
    }
}

/// Outbound wrapper for topic-flavor sessions
#[derive(Debug, Serialize)]
struct TopicFrame<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    destination: Option<String>,
    body: &'a ServerMessage,
}

/// Room a topic destination maps to, if it is a broadcast destination
pub fn room_for_destination(destination: &str) -> Option<&str> {
    destination.strip_prefix(TOPIC_PREFIX).filter(|r| !r.is_empty())
}

/// Broadcast destination for a room
pub fn destination_for_room(room: &str) -> String {
    format!("{}{}", TOPIC_PREFIX, room)
}
