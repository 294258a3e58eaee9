//! In-memory implementations of the domain repositories.

pub mod access;
pub mod message;

pub use access::InMemoryRoomAccess;
pub use message::InMemoryMessageStore;
