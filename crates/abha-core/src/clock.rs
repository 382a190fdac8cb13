//! Wall-clock abstraction.
//!
//! Expiry checks (OTP records, session tokens) compare against `Clock::now()`
//! instead of calling `Utc::now()` directly, so tests can pin time.

use chrono::{DateTime, Utc};

pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
