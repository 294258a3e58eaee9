//! UseCase: 履歴取得処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - HistoryPage::normalize() によるページ指定の正規化
//! - FetchHistoryUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 不正な limit / offset がエラーではなく既定値に丸められることを保証
//! - 履歴が古い順で返り、ページを連結すると全履歴が復元できることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：既定のページ、明示的なページ
//! - エッジケース：範囲外・数値でない limit、負の offset
//! - 異常系：権限なし、ストア障害

use std::sync::Arc;

use crate::{
    domain::{ChatMessage, ParticipantId, RoomAccess, RoomId},
    hub::Hub,
};

use super::error::UseCaseError;

/// Page size used when the caller gives none or an out-of-range one.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const MAX_HISTORY_LIMIT: usize = 100;

/// A normalised history page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPage {
    pub limit: usize,
    /// Messages to skip, counted from the oldest
    pub offset: usize,
}

impl Default for HistoryPage {
    fn default() -> Self {
        Self {
            limit: DEFAULT_HISTORY_LIMIT,
            offset: 0,
        }
    }
}

impl HistoryPage {
    /// Build a page from raw query values.
    ///
    /// Never fails: a limit outside `1..=100` or that does not parse becomes
    /// 50, and a negative or unparsable offset becomes 0.
    pub fn normalize(limit: Option<&str>, offset: Option<&str>) -> Self {
        let limit = limit
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|n| (1..=MAX_HISTORY_LIMIT as i64).contains(n))
            .map_or(DEFAULT_HISTORY_LIMIT, |n| n as usize);
        let offset = offset
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|n| *n >= 0)
            .map_or(0, |n| n as usize);

        Self { limit, offset }
    }
}

/// 履歴取得のユースケース
pub struct FetchHistoryUseCase {
    hub: Hub,
    access: Arc<dyn RoomAccess>,
}

impl FetchHistoryUseCase {
    pub fn new(hub: Hub, access: Arc<dyn RoomAccess>) -> Self {
        Self { hub, access }
    }

    /// ルームの永続化済みメッセージを古い順で 1 ページ分取得
    pub async fn execute(
        &self,
        room: &RoomId,
        participant: &ParticipantId,
        page: HistoryPage,
    ) -> Result<Vec<ChatMessage>, UseCaseError> {
        self.access.check(room, participant).await?;

        Ok(self.hub.history(room, page.limit, page.offset).await?)
    }
}
