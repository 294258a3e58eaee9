//! InMemory MessageStore 実装
//!
//! ドメイン層が定義する MessageStore trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! メッセージはルームごとに追記順（= 古い順）で保持するため、
//! history は並べ替えなしでスライスを返すだけで古い順になります。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, MessageId, MessageStore, RoomId, StoreError};

#[derive(Default)]
struct StoreState {
    /// Last identifier handed out; identifiers are global across rooms
    last_id: u64,
    rooms: HashMap<RoomId, Vec<ChatMessage>>,
}

/// インメモリ MessageStore 実装
pub struct InMemoryMessageStore {
    state: Mutex<StoreState>,
    /// Maximum number of messages per room (`None` = unbounded)
    capacity: Option<usize>,
}

impl InMemoryMessageStore {
    /// 上限なしのストアを作成
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            capacity: None,
        }
    }

    /// ルームあたり `capacity` 件までのストアを作成
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
            capacity: Some(capacity),
        }
    }

    /// Number of messages stored for `room`.
    #[cfg(test)]
    pub(crate) async fn count(&self, room: &RoomId) -> usize {
        let state = self.state.lock().await;
        state.rooms.get(room).map_or(0, Vec::len)
    }
}

impl Default for InMemoryMessageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, message: ChatMessage) -> Result<ChatMessage, StoreError> {
        let mut state = self.state.lock().await;

        let stored = state.rooms.get(&message.room).map_or(0, Vec::len);
        if let Some(capacity) = self.capacity
            && stored >= capacity
        {
            return Err(StoreError::CapacityExceeded {
                room: message.room.to_string(),
                capacity,
            });
        }

        state.last_id += 1;
        let message = message.with_id(MessageId::new(state.last_id));
        state
            .rooms
            .entry(message.room.clone())
            .or_default()
            .push(message.clone());

        Ok(message)
    }

    async fn history(
        &self,
        room: &RoomId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ChatMessage>, StoreError> {
        let state = self.state.lock().await;
        let messages = state
            .rooms
            .get(room)
            .map(|messages| messages.iter().skip(offset).take(limit).cloned().collect())
            .unwrap_or_default();
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DisplayName, MessageBody, MessageKind, Participant, ParticipantId, Timestamp,
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - append による採番と保存
    // - history のページング（古い順、重複・欠落なし）
    // - ルームごとの上限超過エラー
    // ========================================

    fn room(id: &str) -> RoomId {
        RoomId::new(id.to_string()).unwrap()
    }

    fn message(room_id: &str, body: &str, at: i64) -> ChatMessage {
        let alice = Participant::new(
            ParticipantId::new("alice".to_string()).unwrap(),
            DisplayName::new("Alice".to_string()).unwrap(),
        );
        ChatMessage::user(
            room(room_id),
            &alice,
            MessageBody::new(body.to_string(), 1000).unwrap(),
            Timestamp::new(at),
        )
    }

    #[tokio::test]
    async fn test_append_assigns_increasing_ids() {
        // テスト項目: append するたびに増加する ID が採番される
        // given (前提条件):
        let store = InMemoryMessageStore::new();

        // when (操作):
        let first = store.append(message("pool-7", "one", 1)).await.unwrap();
        let second = store.append(message("pool-8", "two", 2)).await.unwrap();

        // then (期待する結果):
        assert_eq!(first.id, Some(MessageId::new(1)));
        assert_eq!(second.id, Some(MessageId::new(2)));
        assert_eq!(first.kind, MessageKind::User);
        assert_eq!(store.count(&room("pool-7")).await, 1);
    }

    #[tokio::test]
    async fn test_history_is_oldest_first() {
        // テスト項目: history は古い順で返される
        // given (前提条件):
        let store = InMemoryMessageStore::new();
        for (i, body) in ["one", "two", "three"].iter().enumerate() {
            store.append(message("pool-7", body, i as i64)).await.unwrap();
        }

        // when (操作):
        let history = store.history(&room("pool-7"), 50, 0).await.unwrap();

        // then (期待する結果):
        let bodies: Vec<_> = history.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_history_pages_reconstruct_full_sequence() {
        // テスト項目: offset を増やしながら連結すると重複・欠落なく全履歴が復元される
        // given (前提条件):
        let store = InMemoryMessageStore::new();
        for i in 0..23 {
            store
                .append(message("pool-7", &format!("m{i}"), i))
                .await
                .unwrap();
        }

        // when (操作):
        let mut all = Vec::new();
        let mut offset = 0;
        loop {
            let page = store.history(&room("pool-7"), 5, offset).await.unwrap();
            if page.is_empty() {
                break;
            }
            offset += page.len();
            all.extend(page);
        }

        // then (期待する結果):
        let bodies: Vec<_> = all.iter().map(|m| m.body.to_string()).collect();
        let expected: Vec<_> = (0..23).map(|i| format!("m{i}")).collect();
        assert_eq!(bodies, expected);
    }

    #[tokio::test]
    async fn test_history_of_unknown_room_is_empty() {
        // テスト項目: メッセージのないルームの履歴は空
        // given (前提条件):
        let store = InMemoryMessageStore::new();

        // when (操作):
        let history = store.history(&room("nowhere"), 50, 0).await.unwrap();

        // then (期待する結果):
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_capacity_exceeded() {
        // テスト項目: ルームの上限を超えた append はエラーになり、他のルームには影響しない
        // given (前提条件):
        let store = InMemoryMessageStore::with_capacity(2);
        store.append(message("pool-7", "one", 1)).await.unwrap();
        store.append(message("pool-7", "two", 2)).await.unwrap();

        // when (操作):
        let result = store.append(message("pool-7", "three", 3)).await;
        let other_room = store.append(message("pool-8", "hello", 4)).await;

        // then (期待する結果):
        assert_eq!(
            result.unwrap_err(),
            StoreError::CapacityExceeded {
                room: "pool-7".to_string(),
                capacity: 2
            }
        );
        assert!(other_room.is_ok());
        assert_eq!(store.count(&room("pool-7")).await, 2);
    }
}
