//! Real-time chat hub library.
//!
//! Participants attach a stream to a room, and every message sent into the
//! room is persisted and broadcast to the room's live members in one order.

pub mod config;
pub mod domain;
pub mod hub;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use config::ServerConfig;
pub use hub::{Hub, HubConfig};
pub use ui::{build_router, build_state, run, serve};
