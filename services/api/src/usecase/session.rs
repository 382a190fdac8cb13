use std::sync::Arc;

use anyhow::Context as _;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use abha_auth_types::token::{SessionClaims, SessionInfo, SessionSigner, validate_session_token};
use abha_core::clock::Clock;

use crate::domain::repository::{OtpStore, UserDirectory};
use crate::domain::types::{SessionToken, UserRecord};
use crate::error::ApiServiceError;
use crate::usecase::otp::{VerifyOtpInput, VerifyOtpUseCase};

fn unix_secs(at: DateTime<Utc>) -> Result<u64, ApiServiceError> {
    u64::try_from(at.timestamp())
        .context("timestamp before UNIX epoch")
        .map_err(ApiServiceError::from)
}

fn from_unix_secs(secs: u64) -> Result<DateTime<Utc>, ApiServiceError> {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .context("timestamp out of range")
        .map_err(ApiServiceError::from)
}

// ── SessionMinter ────────────────────────────────────────────────────────────

/// Mints and checks session tokens. Holds no state besides the signer and the
/// validity window; `now` is always passed in.
#[derive(Clone)]
pub struct SessionMinter {
    signer: Arc<dyn SessionSigner>,
    validity: Duration,
}

impl SessionMinter {
    pub fn new(signer: Arc<dyn SessionSigner>, validity: Duration) -> Self {
        Self { signer, validity }
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Token for `subject_id` valid from `now` (truncated to the second) for
    /// the configured window.
    pub fn mint(&self, subject_id: Uuid, now: DateTime<Utc>) -> Result<SessionToken, ApiServiceError> {
        let iat = unix_secs(now)?;
        let window = u64::try_from(self.validity.num_seconds()).context("negative validity window")?;
        let exp = iat.checked_add(window).context("validity window overflows")?;

        let claims = SessionClaims {
            sub: subject_id.to_string(),
            iat,
            exp,
        };
        let token = self
            .signer
            .sign(&claims)
            .map_err(|e| ApiServiceError::Internal(e.into()))?;

        Ok(SessionToken {
            token,
            subject_id,
            issued_at: from_unix_secs(iat)?,
            expires_at: from_unix_secs(exp)?,
        })
    }

    /// Accept `token` only if the signature holds and `now` is before its expiry.
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionInfo, ApiServiceError> {
        let now_secs = unix_secs(now)?;
        validate_session_token(token, self.signer.as_ref(), now_secs).map_err(|e| {
            tracing::debug!(error = %e, "session token rejected");
            ApiServiceError::InvalidToken
        })
    }
}

// ── CreateSession (OTP login) ────────────────────────────────────────────────

pub struct CreateSessionInput {
    pub identity: String,
    pub code: String,
}

#[derive(Debug)]
pub struct CreateSessionOutput {
    pub user: UserRecord,
    pub session: SessionToken,
}

pub struct CreateSessionUseCase<S: OtpStore, U: UserDirectory> {
    pub verifier: VerifyOtpUseCase<S, U>,
    pub minter: SessionMinter,
    pub clock: Arc<dyn Clock>,
}

impl<S: OtpStore, U: UserDirectory> CreateSessionUseCase<S, U> {
    pub async fn execute(
        &self,
        input: CreateSessionInput,
    ) -> Result<CreateSessionOutput, ApiServiceError> {
        let user = self
            .verifier
            .execute(VerifyOtpInput {
                identity: input.identity,
                code: input.code,
            })
            .await?;

        let session = self.minter.mint(user.id, self.clock.now())?;
        tracing::info!(user_id = %user.id, expires_at = %session.expires_at, "session created");

        Ok(CreateSessionOutput { user, session })
    }
}
