//! WebSocket connection handlers.

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    future,
    sink::SinkExt,
    stream::{self, SplitStream, StreamExt},
};

use crate::{
    hub::Connection,
    infrastructure::dto::http::IdentityQuery,
    ui::{error::ApiError, state::AppState},
};

use super::{identity, room_id};

/// Authorize and attach before upgrading, so refusals surface as HTTP status codes.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(room): Path<String>,
    Query(query): Query<IdentityQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let room = room_id(room)?;
    let participant = identity(query)?;

    let connection = state.join_room().execute(room, participant).await?;

    // An upgrade that never completes drops the connection, which still drains.
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, connection)))
}

async fn handle_socket(socket: WebSocket, connection: Connection) {
    let (sender, receiver) = socket.split();

    let outgoing = sender.with(|frame: String| {
        future::ready(Ok::<_, axum::Error>(Message::Text(frame.into())))
    });

    connection.run(text_frames(receiver), outgoing).await;
}

/// Text payloads from the socket; ends at the close frame.
fn text_frames(
    receiver: SplitStream<WebSocket>,
) -> impl stream::Stream<Item = Result<String, String>> + Unpin + Send {
    Box::pin(stream::unfold(receiver, |mut receiver| async move {
        loop {
            let item = match receiver.next().await? {
                Ok(Message::Text(text)) => Ok(text.as_str().to_owned()),
                Ok(Message::Binary(_)) => Err("binary frames are not supported".to_string()),
                // Ping/pong is handled automatically by the WebSocket protocol
                Ok(Message::Ping(_) | Message::Pong(_)) => continue,
                Ok(Message::Close(_)) => return None,
                Err(e) => Err(e.to_string()),
            };
            return Some((item, receiver));
        }
    }))
}
