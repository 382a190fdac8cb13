use chrono::Duration;

use crate::domain::repository::OtpStore;
use crate::domain::types::ConsumeOutcome;
use crate::error::ApiServiceError;
use crate::infra::otp_memory::MemoryOtpStore;
use crate::infra::otp_redis::RedisOtpStore;

/// OTP store picked at startup: Redis when `REDIS_URL` is set, in-process otherwise.
#[derive(Clone)]
pub enum OtpBackend {
    Memory(MemoryOtpStore),
    Redis(RedisOtpStore),
}

impl OtpStore for OtpBackend {
    async fn put(&self, identity: &str, code: &str, ttl: Duration) -> Result<(), ApiServiceError> {
        match self {
            Self::Memory(store) => store.put(identity, code, ttl).await,
            Self::Redis(store) => store.put(identity, code, ttl).await,
        }
    }

    async fn try_consume(
        &self,
        identity: &str,
        code: &str,
    ) -> Result<ConsumeOutcome, ApiServiceError> {
        match self {
            Self::Memory(store) => store.try_consume(identity, code).await,
            Self::Redis(store) => store.try_consume(identity, code).await,
        }
    }
}
