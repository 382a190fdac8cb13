use std::sync::Arc;

use bytes::Bytes;

use crate::relay::registry::{ConnectionId, ConnectionRegistry};

/// Message body forwarded verbatim. The relay never inspects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(Arc<str>),
    Binary(Bytes),
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Self::Text(Arc::from(text))
    }
}

/// Fans a published message out to every registered connection.
#[derive(Clone)]
pub struct BroadcastRelay {
    registry: ConnectionRegistry,
}

impl BroadcastRelay {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Deliver `payload` to every connection registered at the time of the
    /// call, `sender` included. Returns how many mailboxes accepted it.
    ///
    /// Mailboxes are unbounded, so a slow recipient never stalls the publisher.
    /// A closed mailbox is skipped. Successive publishes from one sender land
    /// in each mailbox in call order.
    pub fn publish(&self, sender: ConnectionId, payload: Payload) -> usize {
        let recipients = self.registry.recipients();
        let total = recipients.len();
        let mut delivered = 0;
        for (id, mailbox) in recipients {
            if mailbox.send(payload.clone()).is_ok() {
                delivered += 1;
            } else {
                tracing::debug!(connection_id = %id, sender = %sender, "mailbox closed, skipping");
            }
        }
        tracing::trace!(sender = %sender, delivered, total, "message relayed");
        delivered
    }
}
