//! Session token signing and validation.
//!
//! Callers never touch the secret directly: they go through [`SessionSigner`],
//! so another key scheme can be dropped in without changing issuance or
//! validation call sites.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity extracted from a validated session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub subject_id: Uuid,
    pub issued_at: u64,
    pub expires_at: u64,
}

/// Errors returned by [`SessionSigner`] and [`validate_session_token`].
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// JWT claims payload of a session token.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | user ID (UUID string) |
/// | `iat` | `iat` | issued at, seconds since epoch |
/// | `exp` | `exp` | expires at, seconds since epoch |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

/// Signing interface for session tokens.
///
/// `verify` checks signature and structure only. Expiry is decided by
/// [`validate_session_token`] against an explicit `now`.
pub trait SessionSigner: Send + Sync {
    fn sign(&self, claims: &SessionClaims) -> Result<String, AuthError>;
    fn verify(&self, token: &str) -> Result<SessionClaims, AuthError>;
}

/// HS256 signer keyed by a single shared secret. Anyone holding the secret can
/// both mint and verify.
pub struct HmacSessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl HmacSessionSigner {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl std::fmt::Debug for HmacSessionSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacSessionSigner").finish_non_exhaustive()
    }
}

impl SessionSigner for HmacSessionSigner {
    fn sign(&self, claims: &SessionClaims) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding).map_err(AuthError::Signing)
    }

    fn verify(&self, token: &str) -> Result<SessionClaims, AuthError> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => AuthError::InvalidSignature,
                _ => AuthError::Malformed,
            })
    }
}

/// Validate a presented session token at `now_secs` (seconds since epoch).
///
/// A token is accepted while `now_secs < exp`; at `exp` and later it is
/// rejected with [`AuthError::Expired`].
pub fn validate_session_token(
    token: &str,
    signer: &dyn SessionSigner,
    now_secs: u64,
) -> Result<SessionInfo, AuthError> {
    let claims = signer.verify(token)?;
    if claims.exp <= now_secs {
        return Err(AuthError::Expired);
    }
    let subject_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| AuthError::Malformed)?;
    Ok(SessionInfo {
        subject_id,
        issued_at: claims.iat,
        expires_at: claims.exp,
    })
}
