//! UseCase: 接続中メンバー一覧の取得

use std::sync::Arc;

use crate::{
    domain::{Participant, ParticipantId, RoomAccess, RoomId},
    hub::Hub,
};

use super::error::UseCaseError;

/// 接続中メンバー一覧取得のユースケース
pub struct ListMembersUseCase {
    hub: Hub,
    access: Arc<dyn RoomAccess>,
}

impl ListMembersUseCase {
    pub fn new(hub: Hub, access: Arc<dyn RoomAccess>) -> Self {
        Self { hub, access }
    }

    /// ルームに接続中の参加者を返す
    ///
    /// 同じ参加者が複数の接続を持つ場合は 1 件にまとめる。
    pub async fn execute(
        &self,
        room: &RoomId,
        participant: &ParticipantId,
    ) -> Result<Vec<Participant>, UseCaseError> {
        self.access.check(room, participant).await?;

        let mut members = self.hub.members_of(room).await;
        members.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
        members.dedup_by(|a, b| a.id == b.id);
        Ok(members)
    }
}
