//! WebSocket frame DTOs for the chat hub.

use serde::{Deserialize, Serialize};

use crate::domain::{ChatMessage, MessageKind};

/// Frame sent by a client after attaching.
///
/// `message` and `type` are accepted as legacy names for `body` and `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundFrame {
    #[serde(alias = "message")]
    pub body: String,
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<MessageKind>,
}

/// Full message record sent to clients, also used for history responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub room: String,
    pub participant_id: String,
    pub display_name: String,
    pub body: String,
    pub kind: MessageKind,
    /// RFC 3339 (UTC)
    pub timestamp: String,
}

impl From<&ChatMessage> for OutboundFrame {
    fn from(message: &ChatMessage) -> Self {
        Self {
            id: message.id.map(|id| id.value()),
            room: message.room.as_str().to_string(),
            participant_id: message.participant_id.as_str().to_string(),
            display_name: message.display_name.as_str().to_string(),
            body: message.body.as_str().to_string(),
            kind: message.kind,
            timestamp: message.timestamp.to_rfc3339(),
        }
    }
}
