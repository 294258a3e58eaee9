//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 権限確認の後に Hub へ接続を登録する処理
//!
//! ### なぜこのテストが必要か
//! - 権限のない参加者が Hub に到達しないことを保証
//! - 参加成功時に入室通知が配信されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：権限のある参加者の参加
//! - 異常系：権限のない参加者の参加試行
//! - 異常系：シャットダウン中の参加試行

use std::sync::Arc;

use crate::{
    domain::{Participant, RoomAccess, RoomId},
    hub::{Connection, Hub},
};

use super::error::UseCaseError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    hub: Hub,
    /// 権限確認（外部コラボレーターの抽象化）
    access: Arc<dyn RoomAccess>,
}

impl JoinRoomUseCase {
    /// 新しい JoinRoomUseCase を作成
    pub fn new(hub: Hub, access: Arc<dyn RoomAccess>) -> Self {
        Self { hub, access }
    }

    /// ルーム参加を実行
    ///
    /// # Returns
    ///
    /// * `Ok(Connection)` - 登録済みの接続（`Connection::run` で駆動する）
    /// * `Err(UseCaseError)` - 権限がない、または Hub が受け付けていない
    pub async fn execute(
        &self,
        room: RoomId,
        participant: Participant,
    ) -> Result<Connection, UseCaseError> {
        // 1. 権限確認（失敗時は Hub に到達しない）
        self.access.check(&room, &participant.id).await?;

        // 2. Hub に登録（入室通知もここでキューに積まれる）
        Ok(self.hub.attach(room, participant).await?)
    }
}
