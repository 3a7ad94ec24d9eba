//! Relay event handler
//!
//! The bridge between inbound client mutation events and the authoritative
//! backend. Each event is driven through an explicit state machine whose
//! terminal states are plain enum values, so every branch is reachable and
//! testable in isolation, with no nested callback chains.
//!
//! Recoverable backend answers (404 on update, 403 on create) are handled
//! entirely in here and never surface to clients. Everything else ends in
//! either a room broadcast or a single `draw-error` to the originator; the
//! relay never crashes on a backend error.

mod draw;
mod ticket;

pub use draw::DrawOutcome;
pub use ticket::TicketOutcome;

use std::sync::Arc;

use crate::gateway::BackendGateway;
use crate::rooms::RoomRegistry;

/// Handles relay protocol steps for one service instance
#[derive(Clone)]
pub struct RelayHandler {
    gateway: BackendGateway,
    rooms: Arc<RoomRegistry>,
}

impl RelayHandler {
    pub fn new(gateway: BackendGateway, rooms: Arc<RoomRegistry>) -> Self {
        Self { gateway, rooms }
    }

    pub(crate) fn gateway(&self) -> &BackendGateway {
        &self.gateway
    }

    pub(crate) fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }
}
