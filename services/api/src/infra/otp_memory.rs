//! In-process OTP store.
//!
//! Records live in a `DashMap` keyed by identity. Every operation touches one
//! entry through the map's entry API, which holds that entry's shard lock for
//! the whole check-and-mutate, so operations on one identity are linearizable.

use std::sync::Arc;

use chrono::Duration;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tokio::task::JoinHandle;

use abha_core::clock::Clock;

use crate::domain::repository::OtpStore;
use crate::domain::types::{ConsumeOutcome, OtpRecord};
use crate::error::ApiServiceError;

#[derive(Clone)]
pub struct MemoryOtpStore {
    inner: Arc<Inner>,
}

struct Inner {
    records: DashMap<String, OtpRecord>,
    clock: Arc<dyn Clock>,
    /// Mismatches allowed per record before it is dropped. `None` means unlimited.
    max_attempts: Option<u32>,
}

impl MemoryOtpStore {
    pub fn new(clock: Arc<dyn Clock>, max_attempts: Option<u32>) -> Self {
        Self {
            inner: Arc::new(Inner {
                records: DashMap::new(),
                clock,
                max_attempts,
            }),
        }
    }

    pub fn insert(&self, identity: &str, code: &str, ttl: Duration) {
        let record = OtpRecord::new(identity, code, self.inner.clock.now(), ttl);
        self.inner.records.insert(identity.to_owned(), record);
    }

    pub fn consume(&self, identity: &str, code: &str) -> ConsumeOutcome {
        let now = self.inner.clock.now();
        let Entry::Occupied(mut entry) = self.inner.records.entry(identity.to_owned()) else {
            return ConsumeOutcome::NotFound;
        };

        if entry.get().is_expired_at(now) {
            entry.remove();
            return ConsumeOutcome::Expired;
        }

        if entry.get().code == code {
            entry.remove();
            return ConsumeOutcome::Consumed;
        }

        let record = entry.get_mut();
        record.failed_attempts = record.failed_attempts.saturating_add(1);
        let exhausted = self
            .inner
            .max_attempts
            .is_some_and(|max| record.failed_attempts >= max);
        if exhausted {
            entry.remove();
        }
        ConsumeOutcome::Mismatch
    }

    /// Snapshot of the pending record for `identity`, expired or not.
    pub fn get(&self, identity: &str) -> Option<OtpRecord> {
        self.inner.records.get(identity).map(|r| r.value().clone())
    }

    /// Drop every record past its expiry. Returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = self.inner.clock.now();
        let mut removed = 0;
        self.inner.records.retain(|_, record| {
            let keep = !record.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.inner.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.records.is_empty()
    }
}

impl OtpStore for MemoryOtpStore {
    async fn put(&self, identity: &str, code: &str, ttl: Duration) -> Result<(), ApiServiceError> {
        self.insert(identity, code, ttl);
        Ok(())
    }

    async fn try_consume(
        &self,
        identity: &str,
        code: &str,
    ) -> Result<ConsumeOutcome, ApiServiceError> {
        Ok(self.consume(identity, code))
    }
}

/// Run `sweep_expired` every `period` until the runtime shuts down.
pub fn spawn_sweeper(store: MemoryOtpStore, period: std::time::Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = store.sweep_expired();
            if removed > 0 {
                tracing::debug!(removed, remaining = store.len(), "swept expired otp records");
            }
        }
    })
}
