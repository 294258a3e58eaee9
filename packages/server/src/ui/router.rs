//! Route table.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::{handler, state::AppState};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handler::health_check))
        .route("/api/pools/{room_id}/chat/ws", get(handler::websocket_handler))
        .route(
            "/api/pools/{room_id}/chat/history",
            get(handler::message_history),
        )
        .route(
            "/api/pools/{room_id}/chat/messages",
            post(handler::send_message),
        )
        .route(
            "/api/pools/{room_id}/chat/members",
            get(handler::list_members),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
