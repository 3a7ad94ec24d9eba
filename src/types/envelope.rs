//! Backend response envelope

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{code, message, data}` envelope used by the authoritative backend.
///
/// The proxy re-emits backend bodies verbatim, so this type is only
/// materialized when the relay itself has to build one (the fixed 502
/// bad-gateway answer) or when a test inspects a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope {
    pub code: u16,
    pub message: String,
    pub data: Value,
}

impl ApiEnvelope {
    /// The fixed envelope returned when the backend cannot be reached
    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            code: 502,
            message: message.into(),
            data: Value::Null,
        }
    }
}
