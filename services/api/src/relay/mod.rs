//! Real-time message relay.
//!
//! [`registry::ConnectionRegistry`] tracks open connections, each with its own
//! unbounded mailbox. [`broadcast::BroadcastRelay`] fans one connection's
//! message out to every mailbox, the sender's included.

pub mod broadcast;
pub mod registry;
