//! HTTP and WebSocket surface of the chat hub.

pub mod error;
mod handler;
mod router;
mod runner;
mod signal;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use runner::{build_state, run, serve};
pub use state::AppState;
