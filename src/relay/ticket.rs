//! Ticket creation trigger
//!
//! Simpler than the draw machine: one create-ticket write against the
//! backend. Tickets have no missing-resource case, so there is no
//! create-on-404 branch.

use tracing::{info, warn};

use super::RelayHandler;
use crate::api::websocket::events::ServerMessage;
use crate::gateway::GatewayError;
use crate::rooms::ConnectionHandle;
use crate::types::TICKET_ROOM;

/// Terminal state of one ticket-creation trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketOutcome {
    /// Ticket created; the fixed ticket room was notified
    Created,
    /// Backend refused; originator was notified
    Rejected { status: u16 },
    /// Backend unreachable; originator was notified with status 502
    Unreachable,
}

impl RelayHandler {
    /// Drive one inbound `ticket-event` to a terminal state.
    pub async fn handle_ticket(&self, origin: &ConnectionHandle) -> TicketOutcome {
        match self.gateway().create_ticket().await {
            Ok(resp) if resp.is_ok() => {
                let delivered = self.rooms().broadcast(
                    TICKET_ROOM,
                    &ServerMessage::TicketUpdate {
                        message: "New ticket created".to_string(),
                    },
                );
                info!(delivered, "ticket created");
                TicketOutcome::Created
            }
            Ok(resp) => {
                warn!(status = resp.status.as_u16(), "ticket creation rejected");
                origin.send(ServerMessage::DrawError {
                    status: resp.status.as_u16(),
                    body: resp.body,
                });
                TicketOutcome::Rejected {
                    status: resp.status.as_u16(),
                }
            }
            Err(GatewayError::Unreachable(err)) => {
                warn!(error = %err, "ticket creation: backend unreachable");
                origin.send(ServerMessage::DrawError {
                    status: 502,
                    body: "Cannot reach backend".to_string(),
                });
                TicketOutcome::Unreachable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::gateway::BackendGateway;
    use crate::rooms::RoomRegistry;

    #[tokio::test]
    async fn test_unreachable_backend_notifies_originator() {
        let rooms = Arc::new(RoomRegistry::new());
        let relay = RelayHandler::new(BackendGateway::new("http://127.0.0.1:1"), Arc::clone(&rooms));
        let (origin, mut origin_rx) = rooms.register();

        let outcome = relay.handle_ticket(&origin).await;

        assert_eq!(outcome, TicketOutcome::Unreachable);
        assert!(matches!(
            origin_rx.recv().await.map(|out| out.message),
            Some(ServerMessage::DrawError { status: 502, .. })
        ));
    }
}
