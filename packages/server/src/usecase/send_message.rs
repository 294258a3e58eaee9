//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - ストリームを持たない送信経路（REST）からのメッセージ送信
//!
//! ### なぜこのテストが必要か
//! - 送信されたメッセージが永続化され、ルームの接続中メンバーに配信されることを確認
//! - 権限確認・本文検証・永続化失敗のエラーハンドリングを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信と配信
//! - 異常系：権限なし、本文が空、容量超過

use std::sync::Arc;

use crate::{
    domain::{ChatMessage, MessageKind, Participant, RoomAccess, RoomId},
    hub::Hub,
};

use super::error::UseCaseError;

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    hub: Hub,
    access: Arc<dyn RoomAccess>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(hub: Hub, access: Arc<dyn RoomAccess>) -> Self {
        Self { hub, access }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `room` - 送信先のルーム
    /// * `participant` - 送信者
    /// * `body` - 未検証の本文
    /// * `kind` - クライアントが指定した種別（`system` は拒否される）
    ///
    /// # Returns
    ///
    /// * `Ok(ChatMessage)` - 永続化済み（ID 採番済み）のメッセージ
    /// * `Err(UseCaseError)` - 送信失敗
    pub async fn execute(
        &self,
        room: RoomId,
        participant: Participant,
        body: String,
        kind: Option<MessageKind>,
    ) -> Result<ChatMessage, UseCaseError> {
        self.access.check(&room, &participant.id).await?;

        let message = self.hub.publish(room, &participant, body, kind).await?;
        tracing::debug!(
            room = %message.room,
            participant = %participant.id,
            "message sent without stream"
        );
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            AccessError, DisplayName, MessageId, MockRoomAccess, ParticipantId, StoreError,
            ValueObjectError,
        },
        hub::{HubConfig, HubError},
        infrastructure::repository::InMemoryMessageStore,
    };

    fn room() -> RoomId {
        RoomId::new("pool-7".to_string()).unwrap()
    }

    fn alice() -> Participant {
        Participant::new(
            ParticipantId::new("alice".to_string()).unwrap(),
            DisplayName::new("Alice".to_string()).unwrap(),
        )
    }

    fn allow_all() -> Arc<dyn RoomAccess> {
        let mut access = MockRoomAccess::new();
        access.expect_check().returning(|_, _| Ok(()));
        Arc::new(access)
    }

    #[tokio::test]
    async fn test_send_message_success() {
        // テスト項目: メッセージが永続化され、ID が採番される
        // given (前提条件):
        let store = Arc::new(InMemoryMessageStore::new());
        let hub = Hub::new(store.clone(), HubConfig::default());
        let usecase = SendMessageUseCase::new(hub, allow_all());

        // when (操作):
        let result = usecase
            .execute(room(), alice(), "Hello!".to_string(), None)
            .await;

        // then (期待する結果):
        let message = result.unwrap();
        assert_eq!(message.id, Some(MessageId::new(1)));
        assert_eq!(message.body.as_str(), "Hello!");
        assert_eq!(message.kind, MessageKind::User);
        assert_eq!(store.count(&room()).await, 1);
    }

    #[tokio::test]
    async fn test_send_message_access_denied() {
        // テスト項目: 権限のない参加者のメッセージは永続化されない
        // given (前提条件):
        let store = Arc::new(InMemoryMessageStore::new());
        let hub = Hub::new(store.clone(), HubConfig::default());
        let mut access = MockRoomAccess::new();
        access.expect_check().returning(|room, participant| {
            Err(AccessError::Denied {
                room: room.to_string(),
                participant: participant.to_string(),
            })
        });
        let usecase = SendMessageUseCase::new(hub, Arc::new(access));

        // when (操作):
        let result = usecase
            .execute(room(), alice(), "Hello!".to_string(), None)
            .await;

        // then (期待する結果):
        assert!(matches!(result, Err(UseCaseError::Access(_))));
        assert_eq!(store.count(&room()).await, 0);
    }

    #[tokio::test]
    async fn test_send_message_empty_body() {
        // テスト項目: 空の本文は検証エラーになる
        // given (前提条件):
        let store = Arc::new(InMemoryMessageStore::new());
        let hub = Hub::new(store.clone(), HubConfig::default());
        let usecase = SendMessageUseCase::new(hub, allow_all());

        // when (操作):
        let result = usecase
            .execute(room(), alice(), String::new(), None)
            .await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            UseCaseError::Hub(HubError::Validation(ValueObjectError::MessageBodyEmpty))
        );
        assert_eq!(store.count(&room()).await, 0);
    }

    #[tokio::test]
    async fn test_send_message_system_kind_rejected() {
        // テスト項目: クライアントは system 種別のメッセージを送信できない
        // given (前提条件):
        let hub = Hub::new(Arc::new(InMemoryMessageStore::new()), HubConfig::default());
        let usecase = SendMessageUseCase::new(hub, allow_all());

        // when (操作):
        let result = usecase
            .execute(
                room(),
                alice(),
                "fake notice".to_string(),
                Some(MessageKind::System),
            )
            .await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            UseCaseError::Hub(HubError::Validation(
                ValueObjectError::SystemKindNotAllowed
            ))
        );
    }

    #[tokio::test]
    async fn test_send_message_capacity_exceeded() {
        // テスト項目: ストアの容量超過時に永続化エラーが返される
        // given (前提条件):
        let store = Arc::new(InMemoryMessageStore::with_capacity(2));
        let hub = Hub::new(store.clone(), HubConfig::default());
        let usecase = SendMessageUseCase::new(hub, allow_all());
        for body in ["Message 1", "Message 2"] {
            usecase
                .execute(room(), alice(), body.to_string(), None)
                .await
                .unwrap();
        }

        // when (操作): 3件目のメッセージを送信
        let result = usecase
            .execute(room(), alice(), "Message 3".to_string(), None)
            .await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            UseCaseError::Hub(HubError::Persistence(StoreError::CapacityExceeded {
                room: "pool-7".to_string(),
                capacity: 2,
            }))
        );
        assert_eq!(store.count(&room()).await, 2);
    }
}
