//! WebSocket module for the relay's persistent connections
//!
//! Exposes the `/ws` endpoint. Sessions join fan-out rooms and exchange the
//! wire events defined in [`events`]; per-connection state and the shared
//! [`state::AppState`] tie the handler to the room registry and the relay.

pub mod events;
pub mod handler;
pub mod state;
