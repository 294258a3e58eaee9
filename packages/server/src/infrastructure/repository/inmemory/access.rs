//! InMemory RoomAccess 実装
//!
//! メンバー一覧が登録されていないルームは誰でも利用できます。
//! 一度でもメンバーが登録されたルームは、登録済みの参加者だけが利用できます。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{AccessError, ParticipantId, RoomAccess, RoomId};

#[derive(Default)]
pub struct InMemoryRoomAccess {
    members: RwLock<HashMap<RoomId, HashSet<ParticipantId>>>,
}

impl InMemoryRoomAccess {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `participant` into `room`, closing the room to everyone not granted.
    pub async fn grant(&self, room: RoomId, participant: ParticipantId) {
        let mut members = self.members.write().await;
        members.entry(room).or_default().insert(participant);
    }

    pub async fn revoke(&self, room: &RoomId, participant: &ParticipantId) {
        let mut members = self.members.write().await;
        if let Some(set) = members.get_mut(room) {
            set.remove(participant);
        }
    }
}

#[async_trait]
impl RoomAccess for InMemoryRoomAccess {
    async fn check(&self, room: &RoomId, participant: &ParticipantId) -> Result<(), AccessError> {
        let members = self.members.read().await;
        match members.get(room) {
            None => Ok(()),
            Some(set) if set.contains(participant) => Ok(()),
            Some(_) => Err(AccessError::Denied {
                room: room.to_string(),
                participant: participant.to_string(),
            }),
        }
    }
}
