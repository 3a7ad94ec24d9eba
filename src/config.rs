//! Service configuration
//!
//! Read from environment variables with the defaults the original
//! deployment used (relay on :3001, backend on :8080).

/// Runtime configuration for the relay
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address the relay listens on (`RELAY_ADDR`)
    pub bind_addr: String,
    /// Base URL of the authoritative backend (`BACKEND_BASE`)
    pub backend_base: String,
}

impl RelayConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("RELAY_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string()),
            backend_base: std::env::var("BACKEND_BASE")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
        }
    }
}
