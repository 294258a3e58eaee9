//! Room registry: which connections are live in which room.
//!
//! This is the only state mutated by more than one task. Every mutation goes
//! through [`RoomRegistry::register`] / [`RoomRegistry::deregister`]; readers
//! get a cloned snapshot so no lock is held while frames are delivered.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::{ConnectionId, RoomId};

use super::connection::ConnectionHandle;

type Members = HashMap<ConnectionId, ConnectionHandle>;

/// Mapping from room to the handles of its live connections.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: Mutex<HashMap<RoomId, Members>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `handle` to the membership set of its room.
    pub async fn register(&self, handle: ConnectionHandle) {
        let mut rooms = self.rooms.lock().await;
        let room = handle.room().clone();
        let id = handle.id();
        let members = rooms.entry(room.clone()).or_default();
        members.insert(id, handle);
        tracing::debug!(room = %room, connection = %id, members = members.len(), "registered");
    }

    /// Remove a connection from a room.
    ///
    /// Returns `false` when the handle was not registered. Empty rooms are
    /// dropped from the map.
    pub async fn deregister(&self, room: &RoomId, id: &ConnectionId) -> bool {
        let mut rooms = self.rooms.lock().await;
        let Some(members) = rooms.get_mut(room) else {
            return false;
        };
        let removed = members.remove(id).is_some();
        if members.is_empty() {
            rooms.remove(room);
        }
        if removed {
            tracing::debug!(room = %room, connection = %id, "deregistered");
        }
        removed
    }

    /// Point-in-time copy of a room's membership.
    pub async fn members_of(&self, room: &RoomId) -> Vec<ConnectionHandle> {
        let rooms = self.rooms.lock().await;
        rooms
            .get(room)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Whether `id` is currently registered in `room`.
    pub async fn contains(&self, room: &RoomId, id: &ConnectionId) -> bool {
        let rooms = self.rooms.lock().await;
        rooms.get(room).is_some_and(|members| members.contains_key(id))
    }

    /// Hold the registry lock, stalling the dispatcher until the guard drops.
    #[cfg(test)]
    pub(crate) async fn lock_rooms(
        &self,
    ) -> tokio::sync::MutexGuard<'_, HashMap<RoomId, Members>> {
        self.rooms.lock().await
    }

    /// Number of rooms with at least one live connection.
    #[cfg(test)]
    pub(crate) async fn room_count(&self) -> usize {
        self.rooms.lock().await.len()
    }
}
