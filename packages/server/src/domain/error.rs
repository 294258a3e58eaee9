//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    #[error("ParticipantId cannot be empty")]
    ParticipantIdEmpty,

    #[error("ParticipantId cannot exceed {max} characters (got {actual})")]
    ParticipantIdTooLong { max: usize, actual: usize },

    #[error("RoomId cannot be empty")]
    RoomIdEmpty,

    #[error("RoomId cannot exceed {max} characters (got {actual})")]
    RoomIdTooLong { max: usize, actual: usize },

    #[error("DisplayName cannot be empty")]
    DisplayNameEmpty,

    #[error("MessageBody cannot be empty")]
    MessageBodyEmpty,

    #[error("MessageBody cannot exceed {max} characters (got {actual})")]
    MessageBodyTooLong { max: usize, actual: usize },

    /// Clients may not author system notices
    #[error("Clients cannot send system messages")]
    SystemKindNotAllowed,
}

/// Errors raised by a [`MessageStore`](super::MessageStore) implementation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The room already holds the maximum number of messages
    #[error("Message capacity exceeded in room '{room}': maximum {capacity} messages allowed")]
    CapacityExceeded { room: String, capacity: usize },

    /// The backing store could not be reached or rejected the write
    #[error("Message store unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by a [`RoomAccess`](super::RoomAccess) implementation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("Participant '{participant}' has no access to room '{room}'")]
    Denied { room: String, participant: String },

    #[error("Access check unavailable: {0}")]
    Unavailable(String),
}
