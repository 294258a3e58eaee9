//! HTTP API request and response DTOs for the chat hub.

use serde::{Deserialize, Serialize};

use super::websocket::OutboundFrame;

/// Identity of the caller, supplied by the upstream authentication layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdentityQuery {
    #[serde(default)]
    pub participant_id: String,
    pub display_name: Option<String>,
}

/// Raw pagination parameters; unparsable values fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// History response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponseDto {
    pub pool_id: String,
    pub messages: Vec<OutboundFrame>,
    pub limit: usize,
    pub offset: usize,
}

/// Send-without-stream response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponseDto {
    pub message: String,
    pub id: Option<u64>,
}

/// Live member of a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemberDto {
    pub participant_id: String,
    pub display_name: String,
}

/// Error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    pub error: String,
    pub code: u16,
}
