//! Backend gateway client
//!
//! All HTTP traffic to the authoritative backend goes through
//! [`BackendGateway`]. Responses are surfaced as raw status + body so
//! callers can branch on the exact status code; a transport-level failure
//! (connection refused, timeout, malformed response stream) maps to the
//! distinguished [`GatewayError::Unreachable`] and is never swallowed.
//!
//! No retries happen at this layer. Retry policy belongs to the relay
//! event handler, which alone knows whether a given operation is safe to
//! re-issue.

use reqwest::{Method, StatusCode};
use serde_json::Value;
use thiserror::Error;

use crate::types::{Blueprint, Point};

/// Errors from the gateway layer
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend could not be reached at the transport level
    #[error("backend unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),
}

/// Raw backend response: status code plus unparsed body text
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub body: String,
}

impl BackendResponse {
    /// Whether the backend accepted the request (2xx)
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    /// Parse the body as JSON, if it is JSON
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }
}

/// HTTP client for the authoritative backend
#[derive(Debug, Clone)]
pub struct BackendGateway {
    http: reqwest::Client,
    base_url: String,
}

impl BackendGateway {
    /// Create a gateway against the given base URL (no trailing slash)
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Issue a read (GET) against the backend
    pub async fn read(&self, path: &str) -> Result<BackendResponse, GatewayError> {
        self.request(Method::GET, path, None).await
    }

    /// Issue a write against the backend with a JSON body
    pub async fn write(
        &self,
        method: Method,
        path: &str,
        body: &Value,
    ) -> Result<BackendResponse, GatewayError> {
        self.request(method, path, Some(body)).await
    }

    /// Forward an arbitrary request verbatim (proxy pass-through). The body
    /// bytes go out untouched, so a malformed payload reaches the backend
    /// exactly as the client sent it and the backend's validation answers.
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<BackendResponse, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, &url);
        if let Some(body) = body {
            req = req
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        Ok(BackendResponse { status, body })
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<BackendResponse, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.http.request(method, &url);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        Ok(BackendResponse { status, body })
    }

    // Paths for the relay's own protocol steps. Author and name come off
    // the wire, so the segments are percent-encoded before they reach the
    // backend URL.

    /// Append a single point to `(author, name)`
    pub async fn put_point(
        &self,
        author: &str,
        name: &str,
        point: Point,
    ) -> Result<BackendResponse, GatewayError> {
        let path = format!(
            "/api/v1/blueprints/{}/{}/points",
            urlencoding::encode(author),
            urlencoding::encode(name)
        );
        let body = serde_json::to_value(point).unwrap_or(Value::Null);
        self.write(Method::PUT, &path, &body).await
    }

    /// Create a blueprint seeded with the pending point
    pub async fn create_blueprint(
        &self,
        author: &str,
        name: &str,
        point: Point,
    ) -> Result<BackendResponse, GatewayError> {
        let seed = Blueprint::seeded(author.to_string(), name.to_string(), point);
        let body = serde_json::to_value(seed).unwrap_or(Value::Null);
        self.write(Method::POST, "/api/v1/blueprints", &body).await
    }

    /// Create a new ticket in the shared queue
    pub async fn create_ticket(&self) -> Result<BackendResponse, GatewayError> {
        self.write(Method::POST, "/api/v1/tickets/create", &Value::Null)
            .await
    }
}
