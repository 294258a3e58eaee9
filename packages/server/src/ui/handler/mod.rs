//! Handler modules for HTTP and WebSocket endpoints.

pub mod http;
pub mod websocket;

use crate::{
    domain::{DisplayName, Participant, ParticipantId, RoomId},
    infrastructure::dto::http::IdentityQuery,
    ui::error::ApiError,
};

// Re-export HTTP handlers
pub use http::{health_check, list_members, message_history, send_message};

// Re-export WebSocket handlers
pub use websocket::websocket_handler;

/// Convert String -> RoomId (Domain Model)
fn room_id(raw: String) -> Result<RoomId, ApiError> {
    RoomId::new(raw).map_err(|e| {
        tracing::warn!(error = %e, "invalid room id");
        ApiError::from(e)
    })
}

/// Build the caller's identity from the query string.
///
/// A missing or blank display name falls back to "Unknown User".
fn identity(query: IdentityQuery) -> Result<Participant, ApiError> {
    let id = ParticipantId::new(query.participant_id).map_err(|e| {
        tracing::warn!(error = %e, "invalid participant id");
        ApiError::from(e)
    })?;
    let display_name = match query.display_name {
        Some(name) if !name.trim().is_empty() => DisplayName::new(name)?,
        _ => DisplayName::unknown(),
    };
    Ok(Participant::new(id, display_name))
}
