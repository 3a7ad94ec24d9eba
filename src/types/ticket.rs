//! Ticket queue types

use serde::{Deserialize, Serialize};

/// Fixed room for ticket board notifications
pub const TICKET_ROOM: &str = "tickets";

/// Lifecycle state of a service ticket.
///
/// Transitions are monotonic and owned by the backend; the relay only
/// requests "create" and "call next", never sets a state directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TicketState {
    Created,
    Called,
    Completed,
}

/// A service ticket in the shared queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub state: TicketState,
}
