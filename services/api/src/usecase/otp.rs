use chrono::Duration;
use rand::RngExt;

use crate::domain::repository::{OtpDelivery, OtpStore, UserDirectory};
use crate::domain::types::{ConsumeOutcome, OTP_MAX, OTP_MIN, UserRecord};
use crate::error::ApiServiceError;

/// Six-digit code drawn uniformly from `OTP_MIN..=OTP_MAX` with the thread-local CSPRNG.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    rng.random_range(OTP_MIN..=OTP_MAX).to_string()
}

// ── IssueOtp ─────────────────────────────────────────────────────────────────

pub struct IssueOtpInput {
    pub identity: String,
}

pub struct IssueOtpUseCase<S, D>
where
    S: OtpStore,
    D: OtpDelivery,
{
    pub store: S,
    pub delivery: D,
    pub ttl: Duration,
}

impl<S, D> IssueOtpUseCase<S, D>
where
    S: OtpStore,
    D: OtpDelivery,
{
    /// Store a fresh code for the identity (replacing any pending one) and hand
    /// it to the delivery channel. A delivery failure is logged, not returned.
    pub async fn execute(&self, input: IssueOtpInput) -> Result<String, ApiServiceError> {
        let code = generate_code();
        self.store.put(&input.identity, &code, self.ttl).await?;

        if let Err(e) = self.delivery.deliver(&input.identity, &code).await {
            tracing::warn!(error = %e, identity = %input.identity, "otp delivery failed");
        }
        Ok(code)
    }
}

// ── VerifyOtp ────────────────────────────────────────────────────────────────

pub struct VerifyOtpInput {
    pub identity: String,
    pub code: String,
}

pub struct VerifyOtpUseCase<S, U>
where
    S: OtpStore,
    U: UserDirectory,
{
    pub store: S,
    pub users: U,
}

impl<S, U> VerifyOtpUseCase<S, U>
where
    S: OtpStore,
    U: UserDirectory,
{
    /// Consume the code and resolve the identity to a directory user.
    ///
    /// Missing, expired and wrong codes all surface as `InvalidOtp`.
    pub async fn execute(&self, input: VerifyOtpInput) -> Result<UserRecord, ApiServiceError> {
        let outcome = self.store.try_consume(&input.identity, &input.code).await?;
        if outcome != ConsumeOutcome::Consumed {
            tracing::debug!(identity = %input.identity, ?outcome, "otp rejected");
            return Err(ApiServiceError::InvalidOtp);
        }

        self.users
            .find_by_email(&input.identity)
            .await?
            .ok_or(ApiServiceError::UserNotFound)
    }
}
