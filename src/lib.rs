//! Blueprint Relay
//!
//! A real-time relay bridging clients that collaboratively edit a shared
//! resource (a drawn blueprint, or a queue of service tickets) and the
//! authoritative HTTP backend that owns persistence.
//!
//! # What the relay does
//!
//! - Receives client mutation events over a persistent WebSocket connection
//! - Reconciles each event against the backend (create-on-missing,
//!   retry-once-on-conflict, error surfacing to the originator)
//! - Fans accepted changes out to every member of the logical room
//! - Proxies plain REST reads/writes to the backend verbatim
//!
//! It guarantees per-connection ordering and at-least-once delivery to room
//! members; it does not order independent authors against each other.
//!
//! # Modules
//!
//! - `types`: Core data structures (Point, Blueprint, Ticket)
//! - `gateway`: HTTP client for the authoritative backend
//! - `relay`: The event-handling state machine
//! - `rooms`: Room registry for fan-out
//! - `canvas`: Client-side point stream reconciliation
//! - `transport`: Channel vs topic session flavors
//! - `api`: Axum router, WebSocket handler and proxy pass-through
//! - `config`: Environment-variable configuration

pub mod api;
pub mod canvas;
pub mod config;
pub mod gateway;
pub mod relay;
pub mod rooms;
pub mod transport;
pub mod types;

// Re-export commonly used items at crate root
pub use api::http::create_router;
pub use api::websocket::events::{ClientMessage, DrawEvent, ServerMessage};
pub use api::websocket::state::AppState;
pub use canvas::{DrawOp, PointStream, RecordingSurface, Surface};
pub use config::RelayConfig;
pub use gateway::{BackendGateway, BackendResponse, GatewayError};
pub use relay::{DrawOutcome, RelayHandler, TicketOutcome};
pub use rooms::{ConnectionHandle, Outbound, RoomRegistry};
pub use transport::TransportKind;
pub use types::{ApiEnvelope, Blueprint, Point, Ticket, TicketState, TICKET_ROOM};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
