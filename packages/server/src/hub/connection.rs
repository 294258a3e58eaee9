//! Connection lifecycle.
//!
//! A [`Connection`] is created by [`Hub::attach`](super::Hub::attach) already
//! registered, and is then driven by [`Connection::run`] until its stream ends:
//!
//! ```text
//! Connecting -> Attached -> Draining -> Closed
//! ```
//!
//! Draining always runs, whatever ended the read loop, so the "left" notice and
//! deregistration happen exactly once. If a `Connection` is dropped without
//! being run, the drain is performed from `Drop`.

use std::fmt;

use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::{
    domain::{ChatMessage, ConnectionId, ConnectionIdFactory, Participant, RoomId, Timestamp},
    infrastructure::dto::websocket::InboundFrame,
};

use super::{Hub, HubError};

/// Lifecycle state of a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    /// Registered, read loop running
    Attached,
    /// Read loop exited, leave notice enqueued
    Draining,
    /// Deregistered, stream released
    Closed,
}

impl ConnectionState {
    /// Whether `self -> next` is a legal transition.
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        matches!(
            (self, next),
            (Self::Connecting, Self::Attached)
                | (Self::Attached, Self::Draining)
                | (Self::Draining, Self::Closed)
        )
    }
}

/// Why a connection's read loop stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetachReason {
    /// The client closed the stream
    ClientClosed,
    /// The connection was closed from the server side (eviction or shutdown)
    Closed,
    /// The client sent a frame that could not be decoded
    ProtocolError(String),
    /// The underlying stream failed
    StreamError(String),
    /// The hub stopped accepting messages
    HubClosed,
}

impl fmt::Display for DetachReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ClientClosed => f.write_str("client closed"),
            Self::Closed => f.write_str("closed by server"),
            Self::ProtocolError(e) => write!(f, "protocol error: {e}"),
            Self::StreamError(e) => write!(f, "stream error: {e}"),
            Self::HubClosed => f.write_str("hub closed"),
        }
    }
}

/// Why a frame could not be handed to a connection's outbound buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    /// The outbound buffer is full; the client is not keeping up
    Overflow,
    /// The writer side is gone
    Closed,
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overflow => f.write_str("outbound buffer full"),
            Self::Closed => f.write_str("outbound path closed"),
        }
    }
}

/// Non-owning reference to a live connection, as kept by the registry.
///
/// Dropping or deregistering a handle does not close the connection; call
/// [`ConnectionHandle::close`] for that.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    room: RoomId,
    participant: Participant,
    outbound: mpsc::Sender<String>,
    closer: CancellationToken,
}

impl ConnectionHandle {
    pub(crate) fn new(
        room: RoomId,
        participant: Participant,
        outbound_capacity: usize,
        closer: CancellationToken,
    ) -> (Self, mpsc::Receiver<String>) {
        let (outbound, rx) = mpsc::channel(outbound_capacity.max(1));
        let handle = Self {
            id: ConnectionIdFactory::generate(),
            room,
            participant,
            outbound,
            closer,
        };
        (handle, rx)
    }

    #[cfg(test)]
    pub(crate) fn detached(
        room: RoomId,
        participant: Participant,
        outbound_capacity: usize,
    ) -> (Self, mpsc::Receiver<String>) {
        Self::new(room, participant, outbound_capacity, CancellationToken::new())
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    pub fn participant(&self) -> &Participant {
        &self.participant
    }

    /// Queue an encoded frame without waiting.
    pub fn try_deliver(&self, frame: String) -> Result<(), DeliveryError> {
        if self.closer.is_cancelled() {
            return Err(DeliveryError::Closed);
        }
        self.outbound.try_send(frame).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::Overflow,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }

    /// Close the connection. Its read loop stops and it drains.
    pub fn close(&self) {
        self.closer.cancel();
    }

    /// Liveness flag.
    pub fn is_closed(&self) -> bool {
        self.closer.is_cancelled()
    }
}

/// One accepted duplex stream bound to one participant in one room.
pub struct Connection {
    hub: Hub,
    handle: ConnectionHandle,
    outbound: Option<mpsc::Receiver<String>>,
    state: ConnectionState,
}

impl Connection {
    pub(super) fn new(hub: Hub, handle: ConnectionHandle, outbound: mpsc::Receiver<String>) -> Self {
        Self {
            hub,
            handle,
            outbound: Some(outbound),
            state: ConnectionState::Connecting,
        }
    }

    pub fn handle(&self) -> &ConnectionHandle {
        &self.handle
    }

    pub fn id(&self) -> ConnectionId {
        self.handle.id
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub(super) fn transition(&mut self, next: ConnectionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal connection transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::trace!(connection = %self.handle.id, from = ?self.state, to = ?next, "state");
        self.state = next;
    }

    /// Drive the connection until its stream ends, then drain it.
    ///
    /// `incoming` yields raw text frames; it ends when the client closes.
    /// `outgoing` receives encoded outbound frames from a dedicated writer task.
    pub async fn run<S, E, K>(mut self, mut incoming: S, outgoing: K) -> DetachReason
    where
        S: Stream<Item = Result<String, E>> + Unpin,
        E: fmt::Display,
        K: Sink<String> + Unpin + Send + 'static,
        K::Error: fmt::Display,
    {
        let writer = self
            .outbound
            .take()
            .map(|rx| tokio::spawn(write_loop(rx, outgoing, self.handle.closer.clone())));

        tracing::info!(
            room = %self.handle.room,
            connection = %self.handle.id,
            participant = %self.handle.participant.id,
            "connection attached"
        );

        let reason = self.read_loop(&mut incoming).await;

        tracing::info!(
            room = %self.handle.room,
            connection = %self.handle.id,
            participant = %self.handle.participant.id,
            reason = %reason,
            "connection detached"
        );

        self.drain(writer).await;
        reason
    }

    async fn read_loop<S, E>(&self, incoming: &mut S) -> DetachReason
    where
        S: Stream<Item = Result<String, E>> + Unpin,
        E: fmt::Display,
    {
        let closer = self.handle.closer.clone();
        loop {
            let next = tokio::select! {
                () = closer.cancelled() => return DetachReason::Closed,
                next = incoming.next() => next,
            };

            let text = match next {
                None => return DetachReason::ClientClosed,
                Some(Err(e)) => return DetachReason::StreamError(e.to_string()),
                Some(Ok(text)) => text,
            };

            let frame = match serde_json::from_str::<InboundFrame>(&text) {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!(connection = %self.handle.id, error = %e, "malformed frame");
                    return DetachReason::ProtocolError(e.to_string());
                }
            };

            if closer.is_cancelled() {
                return DetachReason::Closed;
            }

            // Not raced against `closer`: once appended, a message must reach the dispatcher.
            let published = self
                .hub
                .publish(
                    self.handle.room.clone(),
                    &self.handle.participant,
                    frame.body,
                    frame.kind,
                )
                .await;

            match published {
                Ok(_) => {}
                Err(HubError::Validation(e)) => {
                    tracing::debug!(connection = %self.handle.id, reason = %e, "frame dropped");
                }
                Err(HubError::Persistence(e)) => {
                    tracing::error!(
                        room = %self.handle.room,
                        connection = %self.handle.id,
                        error = %e,
                        "failed to save chat message"
                    );
                }
                Err(HubError::ShuttingDown) => return DetachReason::HubClosed,
            }
        }
    }

    async fn drain(&mut self, writer: Option<JoinHandle<()>>) {
        self.transition(ConnectionState::Draining);
        let left = ChatMessage::left(
            self.handle.room.clone(),
            &self.handle.participant,
            Timestamp::now(),
        );
        self.hub.enqueue(left).await;

        self.hub
            .registry()
            .deregister(&self.handle.room, &self.handle.id)
            .await;

        self.handle.close();
        if let Some(writer) = writer
            && let Err(e) = writer.await
        {
            tracing::warn!(connection = %self.handle.id, error = %e, "writer task failed");
        }
        self.transition(ConnectionState::Closed);
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        // Attached: never run (or run was cancelled) so the leave notice is still owed.
        // Draining: the notice may already be queued; only deregistration is owed.
        let owes_leave = match self.state {
            ConnectionState::Attached => true,
            ConnectionState::Draining => false,
            ConnectionState::Connecting | ConnectionState::Closed => return,
        };
        self.handle.close();
        let hub = self.hub.clone();
        let handle = self.handle.clone();
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        runtime.spawn(async move {
            if owes_leave {
                let left =
                    ChatMessage::left(handle.room.clone(), &handle.participant, Timestamp::now());
                hub.enqueue(left).await;
            }
            hub.registry().deregister(&handle.room, &handle.id).await;
        });
    }
}

/// Forward queued frames to the client until the connection closes.
async fn write_loop<K>(mut rx: mpsc::Receiver<String>, mut sink: K, closer: CancellationToken)
where
    K: Sink<String> + Unpin,
    K::Error: fmt::Display,
{
    loop {
        let frame = tokio::select! {
            () = closer.cancelled() => break,
            frame = rx.recv() => frame,
        };
        let Some(frame) = frame else {
            break;
        };
        if let Err(e) = sink.send(frame).await {
            tracing::warn!(error = %e, "failed to write frame, closing connection");
            closer.cancel();
            break;
        }
    }
    let _ = sink.close().await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        // テスト項目: Attached から Closed へは Draining を経由しないと遷移できない
        // then (期待する結果):
        use ConnectionState::*;
        assert!(Connecting.can_transition_to(Attached));
        assert!(Attached.can_transition_to(Draining));
        assert!(Draining.can_transition_to(Closed));
        assert!(!Attached.can_transition_to(Closed));
        assert!(!Connecting.can_transition_to(Draining));
        assert!(!Closed.can_transition_to(Attached));
    }

    #[test]
    fn test_detach_reason_display() {
        // テスト項目: 切断理由が人間に読める形式で表示される
        // then (期待する結果):
        assert_eq!(DetachReason::ClientClosed.to_string(), "client closed");
        assert_eq!(
            DetachReason::ProtocolError("eof".to_string()).to_string(),
            "protocol error: eof"
        );
    }
}
