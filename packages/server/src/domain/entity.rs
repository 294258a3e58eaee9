//! Core domain models for the chat hub.

use serde::{Deserialize, Serialize};

use super::value_object::{
    DisplayName, MessageBody, MessageId, MessageKind, ParticipantId, RoomId, Timestamp,
};

/// A participant as seen by the hub.
///
/// The display name is a snapshot taken at attach time and is never refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: DisplayName,
}

impl Participant {
    pub fn new(id: ParticipantId, display_name: DisplayName) -> Self {
        Self { id, display_name }
    }
}

/// An immutable chat message scoped to one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Identifier assigned by the store; `None` for unpersisted notices
    pub id: Option<MessageId>,
    pub room: RoomId,
    pub participant_id: ParticipantId,
    pub display_name: DisplayName,
    pub body: MessageBody,
    pub kind: MessageKind,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// Create a message authored by `participant`.
    pub fn user(
        room: RoomId,
        participant: &Participant,
        body: MessageBody,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            id: None,
            room,
            participant_id: participant.id.clone(),
            display_name: participant.display_name.clone(),
            body,
            kind: MessageKind::User,
            timestamp,
        }
    }

    /// "<name> joined the chat" notice.
    pub fn joined(room: RoomId, participant: &Participant, timestamp: Timestamp) -> Self {
        Self::notice(room, participant, "joined the chat", timestamp)
    }

    /// "<name> left the chat" notice.
    pub fn left(room: RoomId, participant: &Participant, timestamp: Timestamp) -> Self {
        Self::notice(room, participant, "left the chat", timestamp)
    }

    fn notice(room: RoomId, participant: &Participant, what: &str, timestamp: Timestamp) -> Self {
        Self {
            id: None,
            room,
            participant_id: participant.id.clone(),
            display_name: participant.display_name.clone(),
            body: MessageBody::notice(format!("{} {what}", participant.display_name)),
            kind: MessageKind::System,
            timestamp,
        }
    }

    /// Attach the identifier assigned by the store.
    pub fn with_id(mut self, id: MessageId) -> Self {
        self.id = Some(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Participant {
        Participant::new(
            ParticipantId::new("alice".to_string()).unwrap(),
            DisplayName::new("Alice".to_string()).unwrap(),
        )
    }

    fn room() -> RoomId {
        RoomId::new("pool-7".to_string()).unwrap()
    }

    #[test]
    fn test_user_message_carries_participant_snapshot() {
        // テスト項目: ユーザーメッセージは送信者の ID と表示名を持つ
        // given (前提条件):
        let participant = alice();
        let body = MessageBody::new("go team".to_string(), 1000).unwrap();

        // when (操作):
        let message = ChatMessage::user(room(), &participant, body, Timestamp::new(1000));

        // then (期待する結果):
        assert_eq!(message.id, None);
        assert_eq!(message.kind, MessageKind::User);
        assert_eq!(message.participant_id, participant.id);
        assert_eq!(message.display_name.as_str(), "Alice");
        assert_eq!(message.body.as_str(), "go team");
    }

    #[test]
    fn test_join_and_leave_notices() {
        // テスト項目: 入室・退室通知はシステムメッセージとして生成される
        // given (前提条件):
        let participant = alice();

        // when (操作):
        let joined = ChatMessage::joined(room(), &participant, Timestamp::new(1));
        let left = ChatMessage::left(room(), &participant, Timestamp::new(2));

        // then (期待する結果):
        assert_eq!(joined.kind, MessageKind::System);
        assert_eq!(joined.body.as_str(), "Alice joined the chat");
        assert_eq!(left.kind, MessageKind::System);
        assert_eq!(left.body.as_str(), "Alice left the chat");
        assert_eq!(left.id, None);
    }

    #[test]
    fn test_with_id() {
        // テスト項目: 永続化で採番された ID を付与できる
        // given (前提条件):
        let message = ChatMessage::joined(room(), &alice(), Timestamp::new(1));

        // when (操作):
        let message = message.with_id(MessageId::new(42));

        // then (期待する結果):
        assert_eq!(message.id, Some(MessageId::new(42)));
    }
}
