//! Hub error definitions.

use thiserror::Error;

use crate::domain::{StoreError, ValueObjectError};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HubError {
    /// The hub no longer accepts attaches or messages
    #[error("Chat hub is shutting down")]
    ShuttingDown,

    /// The message failed validation and was not persisted
    #[error("Invalid message: {0}")]
    Validation(#[from] ValueObjectError),

    /// The message could not be persisted and was not broadcast
    #[error("Failed to persist message: {0}")]
    Persistence(#[from] StoreError),
}
