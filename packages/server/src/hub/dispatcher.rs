//! The single consumer that decides who receives each message.
//!
//! All fan-out decisions go through one task reading one ordered channel, so
//! every recipient in a room observes messages in the order they were queued.
//! Delivery itself never blocks: each recipient has a bounded outbound buffer
//! and a full or closed buffer evicts that recipient.

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::{domain::ChatMessage, infrastructure::dto::websocket::OutboundFrame};

use super::registry::RoomRegistry;

/// Outcome of one fan-out pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub evicted: usize,
}

pub struct Dispatcher {
    registry: Arc<RoomRegistry>,
    inbound: mpsc::Receiver<ChatMessage>,
}

impl Dispatcher {
    pub fn new(registry: Arc<RoomRegistry>, inbound: mpsc::Receiver<ChatMessage>) -> Self {
        Self { registry, inbound }
    }

    /// Run on the current runtime until every producer is gone.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) {
        tracing::debug!("dispatcher started");
        while let Some(message) = self.inbound.recv().await {
            let report = self.dispatch(&message).await;
            tracing::trace!(
                room = %message.room,
                delivered = report.delivered,
                evicted = report.evicted,
                "dispatched"
            );
        }
        tracing::info!("dispatcher stopped: all producers closed");
    }

    /// Deliver `message` to the current members of its room.
    pub async fn dispatch(&self, message: &ChatMessage) -> DispatchReport {
        let mut report = DispatchReport::default();

        let frame = match serde_json::to_string(&OutboundFrame::from(message)) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(room = %message.room, error = %e, "failed to encode message");
                return report;
            }
        };

        let members = self.registry.members_of(&message.room).await;
        for member in members {
            match member.try_deliver(frame.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        room = %message.room,
                        connection = %member.id(),
                        participant = %member.participant().id,
                        error = %e,
                        "failed to send message to client, evicting"
                    );
                    self.registry.deregister(member.room(), &member.id()).await;
                    member.close();
                    report.evicted += 1;
                }
            }
        }

        report
    }
}
