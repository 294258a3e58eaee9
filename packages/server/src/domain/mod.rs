//! Domain layer for the chat hub.
//!
//! This module contains business rules that are independent of
//! data transfer objects (DTOs) and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, Participant};
pub use error::{AccessError, StoreError, ValueObjectError};
pub use factory::ConnectionIdFactory;
pub use repository::{MessageStore, RoomAccess};
pub use value_object::{
    ConnectionId, DEFAULT_MAX_BODY_LEN, DisplayName, MessageBody, MessageId, MessageKind,
    ParticipantId, RoomId, Timestamp,
};

#[cfg(test)]
pub use repository::{MockMessageStore, MockRoomAccess};
