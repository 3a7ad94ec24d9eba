//! Proxy pass-through tests: status/body preservation and the 502 envelope

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use tower::util::ServiceExt;
use wiremock::matchers::{self, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use blueprint_relay::{create_router, AppState, BackendGateway};

fn app_against(backend_url: &str) -> axum::Router {
    create_router(Arc::new(AppState::new(BackendGateway::new(backend_url))))
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_blueprint_fetch_preserves_envelope() {
    let backend = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/blueprints/alice/plan"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": 200,
            "message": "execute ok",
            "data": {"author": "alice", "name": "plan", "points": [{"x": 1, "y": 2}]},
        })))
        .mount(&backend)
        .await;

    let response = app_against(&backend.uri())
        .oneshot(
            Request::builder()
                .uri("/api/v1/blueprints/alice/plan")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["data"]["points"][0]["x"], 1);
}

#[tokio::test]
async fn test_non_json_body_passes_through_as_text() {
    let backend = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/tickets/called"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no called ticket"))
        .mount(&backend)
        .await;

    let response = app_against(&backend.uri())
        .oneshot(
            Request::builder()
                .uri("/api/v1/tickets/called")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    assert_eq!(body_string(response).await, "no called ticket");
}

#[tokio::test]
async fn test_post_forwards_method_and_body() {
    let backend = MockServer::start().await;

    let blueprint = serde_json::json!({
        "author": "alice",
        "name": "plan",
        "points": [{"x": 3, "y": 4}],
    });

    Mock::given(method("POST"))
        .and(path("/api/v1/blueprints"))
        .and(body_json(blueprint.clone()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&backend)
        .await;

    let response = app_against(&backend.uri())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/blueprints")
                .header("content-type", "application/json")
                .body(Body::from(blueprint.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 201);
}

#[tokio::test]
async fn test_put_point_forwards_to_backend() {
    let backend = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/blueprints/alice/plan/points"))
        .and(body_json(serde_json::json!({"x": 7, "y": 8})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&backend)
        .await;

    let response = app_against(&backend.uri())
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri("/api/v1/blueprints/alice/plan/points")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"x":7,"y":8}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 202);
}

/// A body the relay cannot parse still reaches the backend byte for byte;
/// the backend's validation is the one that answers.
#[tokio::test]
async fn test_malformed_body_forwards_verbatim() {
    let backend = MockServer::start().await;

    let raw = r#"{"author": "alice", "name": }"#;

    Mock::given(method("POST"))
        .and(path("/api/v1/blueprints"))
        .and(matchers::body_string(raw))
        .respond_with(ResponseTemplate::new(400).set_body_string("Validation error: name"))
        .expect(1)
        .mount(&backend)
        .await;

    let response = app_against(&backend.uri())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/blueprints")
                .header("content-type", "application/json")
                .body(Body::from(raw))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    assert_eq!(body_string(response).await, "Validation error: name");
}

#[tokio::test]
async fn test_unreachable_backend_returns_fixed_502_envelope() {
    // A dedicated (non-pooled) server: dropping it actually closes the port,
    // unlike the default pooled `MockServer::start()`.
    let backend = MockServer::builder().start().await;
    let url = backend.uri();
    drop(backend);

    let response = app_against(&url)
        .oneshot(
            Request::builder()
                .uri("/api/v1/blueprints")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let json: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(json["code"], 502);
    assert_eq!(json["data"], serde_json::Value::Null);
    assert!(json["message"].as_str().unwrap().contains("Bad gateway"));
}
