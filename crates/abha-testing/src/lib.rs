//! Test utilities for ABHA services.
//!
//! Provides `ManualClock` and session-token helpers.
//! Import from dev-dependencies only, never in production code.

pub mod auth;
pub mod clock;
