//! Redis-backed OTP store for deployments running more than one API process.
//!
//! The code lives under `otp:{identity}` with a Redis TTL; failed attempts are
//! counted under `otp_attempts:{identity}`. Consumption runs as a Lua script so
//! compare-and-delete is a single atomic step on the server. Redis drops
//! expired keys itself, so this backend reports an expired code as
//! [`ConsumeOutcome::NotFound`].

use std::sync::LazyLock;

use anyhow::Context as _;
use chrono::Duration;
use deadpool_redis::Pool;
use deadpool_redis::redis::{Script, pipe};

use crate::domain::repository::OtpStore;
use crate::domain::types::ConsumeOutcome;
use crate::error::ApiServiceError;

/// KEYS[1] = code key, KEYS[2] = attempts key, ARGV[1] = presented code,
/// ARGV[2] = attempt limit (0 = unlimited).
/// Returns 0 = not found, 1 = consumed, 2 = mismatch.
const CONSUME_LUA: &str = r#"
local stored = redis.call('GET', KEYS[1])
if not stored then
  return 0
end
if stored == ARGV[1] then
  redis.call('DEL', KEYS[1], KEYS[2])
  return 1
end
local limit = tonumber(ARGV[2])
if limit > 0 then
  local attempts = redis.call('INCR', KEYS[2])
  if attempts == 1 then
    local ttl = redis.call('PTTL', KEYS[1])
    if ttl > 0 then
      redis.call('PEXPIRE', KEYS[2], ttl)
    end
  end
  if attempts >= limit then
    redis.call('DEL', KEYS[1], KEYS[2])
  end
end
return 2
"#;

static CONSUME_SCRIPT: LazyLock<Script> = LazyLock::new(|| Script::new(CONSUME_LUA));

#[derive(Clone)]
pub struct RedisOtpStore {
    pub pool: Pool,
    pub max_attempts: Option<u32>,
}

fn code_key(identity: &str) -> String {
    format!("otp:{identity}")
}

fn attempts_key(identity: &str) -> String {
    format!("otp_attempts:{identity}")
}

fn outcome_from_reply(reply: i64) -> ConsumeOutcome {
    match reply {
        1 => ConsumeOutcome::Consumed,
        2 => ConsumeOutcome::Mismatch,
        _ => ConsumeOutcome::NotFound,
    }
}

/// Redis `SET EX` takes whole seconds; round up so a sub-second TTL still lives.
fn ttl_secs(ttl: Duration) -> u64 {
    let millis = ttl.num_milliseconds().max(1) as u64;
    millis.div_ceil(1000)
}

impl OtpStore for RedisOtpStore {
    async fn put(&self, identity: &str, code: &str, ttl: Duration) -> Result<(), ApiServiceError> {
        let mut conn = self.pool.get().await.context("get redis connection")?;
        let (): () = pipe()
            .atomic()
            .set_ex(code_key(identity), code, ttl_secs(ttl))
            .ignore()
            .del(attempts_key(identity))
            .ignore()
            .query_async(&mut conn)
            .await
            .context("store otp")?;
        Ok(())
    }

    async fn try_consume(
        &self,
        identity: &str,
        code: &str,
    ) -> Result<ConsumeOutcome, ApiServiceError> {
        let mut conn = self.pool.get().await.context("get redis connection")?;
        let reply: i64 = CONSUME_SCRIPT
            .key(code_key(identity))
            .key(attempts_key(identity))
            .arg(code)
            .arg(self.max_attempts.unwrap_or(0))
            .invoke_async(&mut conn)
            .await
            .context("consume otp")?;
        Ok(outcome_from_reply(reply))
    }
}
