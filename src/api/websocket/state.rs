//! Shared application state

use std::sync::Arc;

use crate::gateway::BackendGateway;
use crate::relay::RelayHandler;
use crate::rooms::RoomRegistry;

/// State shared by the WebSocket handler and the proxy routes.
///
/// The room registry is constructed here, at service start, and reaches the
/// connection-handling layer only through this state; it is torn down with
/// the state, never kept as a process global.
pub struct AppState {
    pub rooms: Arc<RoomRegistry>,
    pub relay: RelayHandler,
    pub gateway: BackendGateway,
}

impl AppState {
    pub fn new(gateway: BackendGateway) -> Self {
        let rooms = Arc::new(RoomRegistry::new());
        let relay = RelayHandler::new(gateway.clone(), Arc::clone(&rooms));
        Self {
            rooms,
            relay,
            gateway,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_shares_one_registry() {
        let state = AppState::new(BackendGateway::new("http://localhost:8080"));
        let (handle, _rx) = state.rooms.register();
        state.rooms.join("room", &handle);
        assert_eq!(state.rooms.member_count("room"), 1);
    }
}
