//! Real-time chat hub.
//!
//! The hub composes the [`RoomRegistry`], the [`Dispatcher`] and a
//! [`MessageStore`] behind a small publish/subscribe surface:
//!
//! - [`Hub::attach`] registers a participant's stream in a room and returns the
//!   [`Connection`] that drives it.
//! - [`Hub::publish`] persists and broadcasts a message without a stream.
//! - [`Hub::history`] and [`Hub::members_of`] serve the request/response path.
//!
//! The dispatcher's inbound channel is private to the hub. It is created with
//! the hub and closes when the last hub handle (including those held by live
//! connections) is dropped.

pub mod config;
pub mod connection;
pub mod dispatcher;
pub mod error;
pub mod registry;

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::domain::{
    ChatMessage, MessageBody, MessageKind, MessageStore, Participant, RoomId, Timestamp,
    ValueObjectError,
};

pub use config::{DEFAULT_INBOUND_CAPACITY, DEFAULT_OUTBOUND_CAPACITY, HubConfig};
pub use connection::{
    Connection, ConnectionHandle, ConnectionState, DeliveryError, DetachReason,
};
pub use dispatcher::{DispatchReport, Dispatcher};
pub use error::HubError;
pub use registry::RoomRegistry;

struct HubInner {
    registry: Arc<RoomRegistry>,
    store: Arc<dyn MessageStore>,
    inbound: mpsc::Sender<ChatMessage>,
    config: HubConfig,
    shutdown: CancellationToken,
}

/// Cloneable handle to the chat hub.
#[derive(Clone)]
pub struct Hub {
    inner: Arc<HubInner>,
}

impl Hub {
    /// Create the hub and spawn its dispatcher on the current runtime.
    pub fn new(store: Arc<dyn MessageStore>, config: HubConfig) -> Self {
        let registry = Arc::new(RoomRegistry::new());
        let (inbound, rx) = mpsc::channel(config.inbound_capacity.max(1));
        Dispatcher::new(registry.clone(), rx).spawn();

        Self {
            inner: Arc::new(HubInner {
                registry,
                store,
                inbound,
                config,
                shutdown: CancellationToken::new(),
            }),
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.inner.registry
    }

    /// `false` once [`Hub::shutdown`] has been called.
    pub fn is_accepting(&self) -> bool {
        !self.inner.shutdown.is_cancelled()
    }

    /// Register `participant` in `room` and announce the join.
    ///
    /// The caller must already have authorized the participant for the room.
    /// The returned connection is registered; drive it with [`Connection::run`].
    pub async fn attach(
        &self,
        room: RoomId,
        participant: Participant,
    ) -> Result<Connection, HubError> {
        if !self.is_accepting() {
            return Err(HubError::ShuttingDown);
        }

        let (handle, outbound) = ConnectionHandle::new(
            room.clone(),
            participant.clone(),
            self.inner.config.outbound_capacity,
            self.inner.shutdown.child_token(),
        );
        self.inner.registry.register(handle.clone()).await;

        let mut connection = Connection::new(self.clone(), handle, outbound);
        connection.transition(ConnectionState::Attached);

        let joined = ChatMessage::joined(room, &participant, Timestamp::now());
        if !self.enqueue(joined).await {
            return Err(HubError::ShuttingDown);
        }

        Ok(connection)
    }

    /// Validate, persist and broadcast one message from `participant`.
    ///
    /// This is the path shared by streaming connections and the
    /// send-without-stream endpoint.
    pub async fn publish(
        &self,
        room: RoomId,
        participant: &Participant,
        body: String,
        kind: Option<MessageKind>,
    ) -> Result<ChatMessage, HubError> {
        if !self.is_accepting() {
            return Err(HubError::ShuttingDown);
        }

        if kind.unwrap_or_default() == MessageKind::System {
            return Err(ValueObjectError::SystemKindNotAllowed.into());
        }
        let body = MessageBody::new(body, self.inner.config.max_body_len)?;

        let message = ChatMessage::user(room, participant, body, Timestamp::now());
        let persisted = self.inner.store.append(message).await?;

        if !self.enqueue(persisted.clone()).await {
            return Err(HubError::ShuttingDown);
        }
        Ok(persisted)
    }

    /// A page of `room`'s persisted messages, oldest first.
    pub async fn history(
        &self,
        room: &RoomId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<ChatMessage>, HubError> {
        Ok(self.inner.store.history(room, limit, offset).await?)
    }

    /// Participants with a live connection in `room`.
    pub async fn members_of(&self, room: &RoomId) -> Vec<Participant> {
        self.inner
            .registry
            .members_of(room)
            .await
            .into_iter()
            .map(|handle| handle.participant().clone())
            .collect()
    }

    /// Stop accepting and close every live connection.
    pub fn shutdown(&self) {
        if self.is_accepting() {
            tracing::info!("chat hub shutting down");
        }
        self.inner.shutdown.cancel();
    }

    /// Queue a message for the dispatcher, waiting while the channel is full.
    pub(crate) async fn enqueue(&self, message: ChatMessage) -> bool {
        match self.inner.inbound.send(message).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(room = %e.0.room, "dispatcher is gone, message discarded");
                false
            }
        }
    }
}
