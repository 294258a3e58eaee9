//! Repository traits owned by the domain layer.
//!
//! Infrastructure provides the implementations; use cases and the hub only see
//! these traits (dependency inversion).

use async_trait::async_trait;

use super::{AccessError, ChatMessage, ParticipantId, RoomId, StoreError};

/// Append-only persistence of chat messages keyed by room.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist `message` and return it with its assigned identifier.
    async fn append(&self, message: ChatMessage) -> Result<ChatMessage, StoreError>;

    /// Page through a room's messages, oldest first.
    ///
    /// `offset` counts from the oldest message, so concatenating pages taken at
    /// increasing offsets rebuilds the room's full history. Implementations
    /// whose backend returns newest first must reorder before returning.
    async fn history(
        &self,
        room: &RoomId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ChatMessage>, StoreError>;
}

/// Decides whether a participant may use a room's chat.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomAccess: Send + Sync {
    async fn check(&self, room: &RoomId, participant: &ParticipantId) -> Result<(), AccessError>;
}
