//! Data types for the blueprint relay
//!
//! This module contains the core data structures shared across the relay:
//! points, blueprints, tickets and the backend response envelope.

mod blueprint;
mod envelope;
mod point;
mod ticket;

pub use blueprint::Blueprint;
pub use envelope::ApiEnvelope;
pub use point::Point;
pub use ticket::{Ticket, TicketState, TICKET_ROOM};
