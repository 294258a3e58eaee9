//! Server runner.

use std::{future::Future, sync::Arc};

use tokio::net::TcpListener;

use crate::{
    config::ServerConfig,
    hub::Hub,
    infrastructure::repository::{InMemoryMessageStore, InMemoryRoomAccess},
};

use super::{router::build_router, signal::shutdown_signal, state::AppState};

/// Build the default in-memory application state from `config`.
pub fn build_state(config: &ServerConfig) -> AppState {
    let store = match config.message_capacity {
        Some(capacity) => InMemoryMessageStore::with_capacity(capacity),
        None => InMemoryMessageStore::new(),
    };
    let hub = Hub::new(Arc::new(store), config.hub_config());
    AppState::new(hub, Arc::new(InMemoryRoomAccess::new()))
}

/// Run the server until SIGINT or SIGTERM.
pub async fn run(config: ServerConfig) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind_address()).await?;
    serve(listener, build_state(&config), shutdown_signal()).await
}

/// Serve on `listener` until `shutdown` resolves, then close the hub.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    tracing::info!("listening on {}", listener.local_addr()?);

    let hub = state.hub.clone();
    let app = build_router(state);

    // Live connections hold the graceful shutdown open, so close the hub as
    // soon as the signal arrives instead of after serve returns.
    let closing = hub.clone();
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown.await;
            closing.shutdown();
        })
        .await;

    hub.shutdown();
    tracing::info!("server stopped");
    result
}
