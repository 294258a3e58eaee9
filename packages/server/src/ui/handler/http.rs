//! HTTP API endpoint handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};

use crate::{
    infrastructure::dto::{
        http::{
            HistoryQuery, HistoryResponseDto, IdentityQuery, MemberDto, SendMessageResponseDto,
        },
        websocket::{InboundFrame, OutboundFrame},
    },
    ui::{error::ApiError, state::AppState},
    usecase::HistoryPage,
};

use super::{identity, room_id};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Page through a room's persisted messages, oldest first.
pub async fn message_history(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Query(query): Query<IdentityQuery>,
    Query(page): Query<HistoryQuery>,
) -> Result<Json<HistoryResponseDto>, ApiError> {
    let room = room_id(room)?;
    let participant = identity(query)?;
    let page = HistoryPage::normalize(page.limit.as_deref(), page.offset.as_deref());

    let messages = state
        .fetch_history()
        .execute(&room, &participant.id, page)
        .await?;

    Ok(Json(HistoryResponseDto {
        pool_id: room.into_string(),
        messages: messages.iter().map(OutboundFrame::from).collect(),
        limit: page.limit,
        offset: page.offset,
    }))
}

/// Send a message without holding a stream.
pub async fn send_message(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Query(query): Query<IdentityQuery>,
    payload: Result<Json<InboundFrame>, JsonRejection>,
) -> Result<Json<SendMessageResponseDto>, ApiError> {
    let room = room_id(room)?;
    let participant = identity(query)?;
    let Json(frame) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let message = state
        .send_message()
        .execute(room, participant, frame.body, frame.kind)
        .await?;

    Ok(Json(SendMessageResponseDto {
        message: "Message sent successfully".to_string(),
        id: message.id.map(|id| id.value()),
    }))
}

/// Participants currently connected to a room.
pub async fn list_members(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Query(query): Query<IdentityQuery>,
) -> Result<Json<Vec<MemberDto>>, ApiError> {
    let room = room_id(room)?;
    let participant = identity(query)?;

    let members = state
        .list_members()
        .execute(&room, &participant.id)
        .await?;

    Ok(Json(
        members
            .into_iter()
            .map(|member| MemberDto {
                participant_id: member.id.into_string(),
                display_name: member.display_name.as_str().to_string(),
            })
            .collect(),
    ))
}
