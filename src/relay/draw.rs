//! Draw event state machine
//!
//! `Start → ForwardToBackend → {Accepted | NeedsCreate | Rejected |
//! Unreachable}`, with `NeedsCreate → {Created | CreateConflict → retry}`.
//! The create-on-404 / retry-on-403 protocol tolerates the race where two
//! clients draw into a not-yet-existing blueprint at the same time: the
//! loser of the create race falls back to a plain update against the
//! blueprint the winner just created.

use reqwest::StatusCode;
use tracing::{debug, info, warn};

use super::RelayHandler;
use crate::api::websocket::events::{DrawEvent, ServerMessage};
use crate::gateway::GatewayError;
use crate::rooms::ConnectionHandle;
use crate::types::{Blueprint, Point, TICKET_ROOM};

/// Terminal state of one draw event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawOutcome {
    /// Backend echo, broadcast without re-forwarding
    Echoed,
    /// Ordinary update accepted and fanned out
    Accepted,
    /// Blueprint did not exist; created with the pending point and fanned out
    Created,
    /// Lost the create race (403); the retried update succeeded silently
    RetriedAfterConflict,
    /// Backend refused the write; originator was notified
    Rejected { status: u16 },
    /// Backend unreachable; originator was notified with status 502
    Unreachable,
    /// Event failed boundary validation; originator was notified
    Invalid,
}

impl RelayHandler {
    /// Drive one inbound `draw-event` to a terminal state.
    ///
    /// Broadcasts and originator notifications happen inside; the returned
    /// outcome is informational (logging, tests).
    pub async fn handle_draw(&self, event: DrawEvent, origin: &ConnectionHandle) -> DrawOutcome {
        if event.is_echo() {
            return self.broadcast_echo(&event);
        }

        let (Some(point), Some(author), Some(name)) =
            (event.point, event.author.as_deref(), event.name.as_deref())
        else {
            origin.send(ServerMessage::DrawError {
                status: 400,
                body: "draw-event requires point, author and name".to_string(),
            });
            return DrawOutcome::Invalid;
        };

        // ForwardToBackend
        let resp = match self.gateway().put_point(author, name, point).await {
            Ok(resp) => resp,
            Err(GatewayError::Unreachable(err)) => {
                warn!(author, name, error = %err, "draw-event: backend unreachable");
                return self.notify_unreachable(origin);
            }
        };

        if resp.is_ok() {
            // Ordinary updates fan out explicitly too, so every room member
            // sees the stroke even when the backend's own echo channel is
            // not connected.
            let room = room_or_default(&event, author, name);
            self.rooms()
                .broadcast(&room, &ServerMessage::single_point_update(author, name, point));
            debug!(room, author, name, "draw-event accepted");
            return DrawOutcome::Accepted;
        }

        if resp.status == StatusCode::NOT_FOUND {
            return self.create_missing(&event, author, name, point, origin).await;
        }

        warn!(author, name, status = resp.status.as_u16(), "draw-event rejected");
        origin.send(ServerMessage::DrawError {
            status: resp.status.as_u16(),
            body: resp.body,
        });
        DrawOutcome::Rejected {
            status: resp.status.as_u16(),
        }
    }

    /// NeedsCreate: the update hit a blueprint the backend does not know
    /// yet. Create it seeded with the single pending point.
    async fn create_missing(
        &self,
        event: &DrawEvent,
        author: &str,
        name: &str,
        point: Point,
        origin: &ConnectionHandle,
    ) -> DrawOutcome {
        let created = match self.gateway().create_blueprint(author, name, point).await {
            Ok(resp) => resp,
            Err(GatewayError::Unreachable(err)) => {
                warn!(author, name, error = %err, "create-on-missing: backend unreachable");
                return self.notify_unreachable(origin);
            }
        };

        if created.is_ok() {
            let room = room_or_default(event, author, name);
            self.rooms()
                .broadcast(&room, &ServerMessage::single_point_update(author, name, point));
            info!(room, author, name, "blueprint created on first draw");
            return DrawOutcome::Created;
        }

        if created.status == StatusCode::FORBIDDEN {
            // A concurrent writer created the blueprint between our update
            // and our create. Re-issue the update exactly once; its fan-out
            // already happened through the winner's create path.
            return self.retry_forward(author, name, point, origin).await;
        }

        warn!(author, name, status = created.status.as_u16(), "create rejected");
        origin.send(ServerMessage::DrawError {
            status: created.status.as_u16(),
            body: created.body,
        });
        DrawOutcome::Rejected {
            status: created.status.as_u16(),
        }
    }

    async fn retry_forward(
        &self,
        author: &str,
        name: &str,
        point: Point,
        origin: &ConnectionHandle,
    ) -> DrawOutcome {
        match self.gateway().put_point(author, name, point).await {
            Ok(retry) if retry.is_ok() => {
                debug!(author, name, "retry after create conflict succeeded");
                DrawOutcome::RetriedAfterConflict
            }
            Ok(retry) => {
                warn!(author, name, status = retry.status.as_u16(), "retry rejected");
                origin.send(ServerMessage::DrawError {
                    status: retry.status.as_u16(),
                    body: retry.body,
                });
                DrawOutcome::Rejected {
                    status: retry.status.as_u16(),
                }
            }
            Err(GatewayError::Unreachable(err)) => {
                warn!(author, name, error = %err, "retry: backend unreachable");
                self.notify_unreachable(origin)
            }
        }
    }

    /// An echo is already backend-accepted: broadcast it as-is, never
    /// forward it again. A point-less echo targets the ticket board.
    fn broadcast_echo(&self, event: &DrawEvent) -> DrawOutcome {
        match (event.point, event.author.as_deref(), event.name.as_deref()) {
            (Some(point), Some(author), Some(name)) => {
                let room = room_or_default(event, author, name);
                self.rooms()
                    .broadcast(&room, &ServerMessage::single_point_update(author, name, point));
            }
            _ => {
                let room = event.room.as_deref().unwrap_or(TICKET_ROOM);
                self.rooms().broadcast(
                    room,
                    &ServerMessage::TicketUpdate {
                        message: "Ticket board changed".to_string(),
                    },
                );
            }
        }
        DrawOutcome::Echoed
    }

    fn notify_unreachable(&self, origin: &ConnectionHandle) -> DrawOutcome {
        origin.send(ServerMessage::DrawError {
            status: 502,
            body: "Cannot reach backend".to_string(),
        });
        DrawOutcome::Unreachable
    }
}

/// Room hint from the event, or the canonical room for the blueprint when
/// the hint is missing.
fn room_or_default(event: &DrawEvent, author: &str, name: &str) -> String {
    event
        .room
        .clone()
        .unwrap_or_else(|| Blueprint::room_id(author, name))
}
