//! Service plumbing shared by ABHA platform binaries.

pub mod clock;
pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
