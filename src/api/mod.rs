//! API module for HTTP and WebSocket endpoints
//!
//! The router exposes the persistent `/ws` connection, a health check, and
//! verbatim proxy pass-through of the backend REST surface.

pub mod http;
pub mod proxy;
pub mod websocket;
