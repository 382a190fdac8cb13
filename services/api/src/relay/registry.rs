use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::mpsc;
use uuid::Uuid;

use abha_core::clock::Clock;

use crate::relay::broadcast::Payload;

/// Opaque identifier assigned when a connection opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Receiving half of a connection's mailbox. The connection task drains it
/// into the socket.
pub type Mailbox = mpsc::UnboundedReceiver<Payload>;

#[derive(Debug, Clone)]
pub struct ConnectionEntry {
    pub joined_at: DateTime<Utc>,
    sender: mpsc::UnboundedSender<Payload>,
}

/// Set of currently open connections.
///
/// One lock guards the whole map and is never held across an await, so
/// register, unregister and snapshot reads are linearizable.
#[derive(Clone)]
pub struct ConnectionRegistry {
    entries: Arc<RwLock<HashMap<ConnectionId, ConnectionEntry>>>,
    clock: Arc<dyn Clock>,
}

impl ConnectionRegistry {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            clock,
        }
    }

    /// Add `id` and hand back its mailbox. Registering an id twice replaces the
    /// old entry, which closes the old mailbox.
    pub fn register(&self, id: ConnectionId) -> Mailbox {
        let (sender, mailbox) = mpsc::unbounded_channel();
        let entry = ConnectionEntry {
            joined_at: self.clock.now(),
            sender,
        };
        if self.entries.write().insert(id, entry).is_some() {
            tracing::warn!(connection_id = %id, "connection re-registered, previous mailbox closed");
        }
        mailbox
    }

    /// Remove `id`. Returns `false` if it was not registered.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        self.entries.write().remove(&id).is_some()
    }

    pub fn list_active(&self) -> HashSet<ConnectionId> {
        self.entries.read().keys().copied().collect()
    }

    pub fn joined_at(&self, id: ConnectionId) -> Option<DateTime<Utc>> {
        self.entries.read().get(&id).map(|e| e.joined_at)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Mailbox senders of every connection registered right now.
    pub(crate) fn recipients(&self) -> Vec<(ConnectionId, mpsc::UnboundedSender<Payload>)> {
        self.entries
            .read()
            .iter()
            .map(|(id, entry)| (*id, entry.sender.clone()))
            .collect()
    }
}
