//! Shared application state.

use std::sync::Arc;

use crate::{
    domain::RoomAccess,
    hub::Hub,
    usecase::{FetchHistoryUseCase, JoinRoomUseCase, ListMembersUseCase, SendMessageUseCase},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub hub: Hub,
    /// 権限確認（外部コラボレーターの抽象化）
    pub access: Arc<dyn RoomAccess>,
}

impl AppState {
    pub fn new(hub: Hub, access: Arc<dyn RoomAccess>) -> Self {
        Self { hub, access }
    }

    pub fn join_room(&self) -> JoinRoomUseCase {
        JoinRoomUseCase::new(self.hub.clone(), self.access.clone())
    }

    pub fn send_message(&self) -> SendMessageUseCase {
        SendMessageUseCase::new(self.hub.clone(), self.access.clone())
    }

    pub fn fetch_history(&self) -> FetchHistoryUseCase {
        FetchHistoryUseCase::new(self.hub.clone(), self.access.clone())
    }

    pub fn list_members(&self) -> ListMembersUseCase {
        ListMembersUseCase::new(self.hub.clone(), self.access.clone())
    }
}
