//! End-to-end relay protocol scenarios against a stubbed backend

use std::sync::Arc;

use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use blueprint_relay::{
    BackendGateway, DrawEvent, DrawOutcome, Point, RelayHandler, RoomRegistry, ServerMessage,
    TicketOutcome, TICKET_ROOM,
};

const ROOM: &str = "blueprints.alice.plan";

fn relay_against(backend_url: &str) -> (RelayHandler, Arc<RoomRegistry>) {
    let rooms = Arc::new(RoomRegistry::new());
    let relay = RelayHandler::new(BackendGateway::new(backend_url), Arc::clone(&rooms));
    (relay, rooms)
}

fn draw_event() -> DrawEvent {
    DrawEvent {
        room: Some(ROOM.to_string()),
        point: Some(Point::new(10, 20)),
        author: Some("alice".to_string()),
        name: Some("plan".to_string()),
        from_backend: None,
    }
}

/// Scenario A: update hits 404, the relay creates the blueprint seeded with
/// the pending point, and the room receives exactly one blueprint-update.
#[tokio::test]
async fn test_create_on_missing_resource() {
    let backend = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/blueprints/alice/plan/points"))
        .respond_with(ResponseTemplate::new(404).set_body_string("blueprint not found"))
        .mount(&backend)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/blueprints"))
        .and(body_json(serde_json::json!({
            "author": "alice",
            "name": "plan",
            "points": [{"x": 10, "y": 20}],
        })))
        .respond_with(ResponseTemplate::new(201))
        .mount(&backend)
        .await;

    let (relay, rooms) = relay_against(&backend.uri());
    let (origin, mut origin_rx) = rooms.register();
    let (member, mut member_rx) = rooms.register();
    rooms.join(ROOM, &origin);
    rooms.join(ROOM, &member);

    let outcome = relay.handle_draw(draw_event(), &origin).await;
    assert_eq!(outcome, DrawOutcome::Created);

    // every room member, originator included, gets exactly one update
    for rx in [&mut origin_rx, &mut member_rx] {
        match rx.try_recv().map(|out| out.message) {
            Ok(ServerMessage::BlueprintUpdate { author, name, points }) => {
                assert_eq!(author, "alice");
                assert_eq!(name, "plan");
                assert_eq!(points, vec![Point::new(10, 20)]);
            }
            other => panic!("expected blueprint-update, got {:?}", other),
        }
        assert!(rx.try_recv().is_err(), "expected exactly one update");
    }
}

/// Scenario B: the create races with a concurrent writer and loses (403);
/// the relay retries the update once and finishes silently.
#[tokio::test]
async fn test_concurrent_create_conflict_retries_silently() {
    let backend = MockServer::start().await;

    // first update: blueprint not there yet
    Mock::given(method("PUT"))
        .and(path("/api/v1/blueprints/alice/plan/points"))
        .respond_with(ResponseTemplate::new(404).set_body_string("blueprint not found"))
        .up_to_n_times(1)
        .mount(&backend)
        .await;

    // create: somebody else won the race
    Mock::given(method("POST"))
        .and(path("/api/v1/blueprints"))
        .respond_with(ResponseTemplate::new(403).set_body_string("blueprint already exists"))
        .expect(1)
        .mount(&backend)
        .await;

    // retried update against the winner's blueprint
    Mock::given(method("PUT"))
        .and(path("/api/v1/blueprints/alice/plan/points"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&backend)
        .await;

    let (relay, rooms) = relay_against(&backend.uri());
    let (origin, mut origin_rx) = rooms.register();
    rooms.join(ROOM, &origin);

    let outcome = relay.handle_draw(draw_event(), &origin).await;
    assert_eq!(outcome, DrawOutcome::RetriedAfterConflict);

    // no error to the originator, no second broadcast from this handler
    assert!(origin_rx.try_recv().is_err());
}

/// Scenario C: the backend is unreachable; the originator gets a single
/// draw-error with status 502 and nobody else hears anything.
#[tokio::test]
async fn test_unreachable_backend_surfaces_502() {
    // A dedicated (non-pooled) server: dropping it actually closes the port,
    // unlike the default pooled `MockServer::start()`.
    let backend = MockServer::builder().start().await;
    let url = backend.uri();
    drop(backend); // port is now dead

    let (relay, rooms) = relay_against(&url);
    let (origin, mut origin_rx) = rooms.register();
    let (member, mut member_rx) = rooms.register();
    rooms.join(ROOM, &origin);
    rooms.join(ROOM, &member);

    let outcome = relay.handle_draw(draw_event(), &origin).await;
    assert_eq!(outcome, DrawOutcome::Unreachable);

    match origin_rx.try_recv().map(|out| out.message) {
        Ok(ServerMessage::DrawError { status, body }) => {
            assert_eq!(status, 502);
            assert_eq!(body, "Cannot reach backend");
        }
        other => panic!("expected draw-error, got {:?}", other),
    }
    assert!(member_rx.try_recv().is_err(), "errors are never broadcast");
}

/// Scenario D: ticket creation succeeds and the fixed ticket room receives
/// exactly one ticket-update.
#[tokio::test]
async fn test_ticket_creation_notifies_fixed_room() {
    let backend = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/tickets/create"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "code": 201,
            "message": "Ticket created successfully",
            "data": null,
        })))
        .mount(&backend)
        .await;

    let (relay, rooms) = relay_against(&backend.uri());
    let (origin, _origin_rx) = rooms.register();
    let (board, mut board_rx) = rooms.register();
    rooms.join(TICKET_ROOM, &board);

    let outcome = relay.handle_ticket(&origin).await;
    assert_eq!(outcome, TicketOutcome::Created);

    match board_rx.try_recv().map(|out| out.message) {
        Ok(ServerMessage::TicketUpdate { message }) => {
            assert_eq!(message, "New ticket created");
        }
        other => panic!("expected ticket-update, got {:?}", other),
    }
    assert!(board_rx.try_recv().is_err(), "expected exactly one update");
}

/// A rejected write (non-2xx, non-404) surfaces the backend's status and
/// body verbatim to the originator only.
#[tokio::test]
async fn test_rejected_write_surfaces_raw_status_and_body() {
    let backend = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/blueprints/alice/plan/points"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&backend)
        .await;

    let (relay, rooms) = relay_against(&backend.uri());
    let (origin, mut origin_rx) = rooms.register();
    rooms.join(ROOM, &origin);

    let outcome = relay.handle_draw(draw_event(), &origin).await;
    assert_eq!(outcome, DrawOutcome::Rejected { status: 500 });

    match origin_rx.try_recv().map(|out| out.message) {
        Ok(ServerMessage::DrawError { status, body }) => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected draw-error, got {:?}", other),
    }
}

/// Accepted ordinary updates fan out explicitly to the room.
#[tokio::test]
async fn test_accepted_update_broadcasts_to_room() {
    let backend = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/blueprints/alice/plan/points"))
        .and(body_json(serde_json::json!({"x": 10, "y": 20})))
        .respond_with(ResponseTemplate::new(202))
        .mount(&backend)
        .await;

    let (relay, rooms) = relay_against(&backend.uri());
    let (origin, _origin_rx) = rooms.register();
    let (member, mut member_rx) = rooms.register();
    rooms.join(ROOM, &member);

    let outcome = relay.handle_draw(draw_event(), &origin).await;
    assert_eq!(outcome, DrawOutcome::Accepted);

    match member_rx.try_recv().map(|out| out.message) {
        Ok(ServerMessage::BlueprintUpdate { points, .. }) => {
            assert_eq!(points, vec![Point::new(10, 20)]);
        }
        other => panic!("expected blueprint-update, got {:?}", other),
    }
}

/// A create failure other than 403 notifies the originator and stops.
#[tokio::test]
async fn test_create_failure_notifies_originator() {
    let backend = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/blueprints/alice/plan/points"))
        .respond_with(ResponseTemplate::new(404).set_body_string("blueprint not found"))
        .mount(&backend)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/blueprints"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Validation error: author"))
        .mount(&backend)
        .await;

    let (relay, rooms) = relay_against(&backend.uri());
    let (origin, mut origin_rx) = rooms.register();
    rooms.join(ROOM, &origin);

    let outcome = relay.handle_draw(draw_event(), &origin).await;
    assert_eq!(outcome, DrawOutcome::Rejected { status: 400 });

    match origin_rx.try_recv().map(|out| out.message) {
        Ok(ServerMessage::DrawError { status, body }) => {
            assert_eq!(status, 400);
            assert_eq!(body, "Validation error: author");
        }
        other => panic!("expected draw-error, got {:?}", other),
    }
}
