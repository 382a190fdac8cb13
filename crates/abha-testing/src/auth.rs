//! Session helpers for integration tests.
//!
//! `MockSession` mints a real HS256 token with a test secret so handlers that
//! validate `Authorization: Bearer` can be exercised without going through OTP
//! login.

use axum::http::{HeaderMap, HeaderValue, header::AUTHORIZATION};
use uuid::Uuid;

use abha_auth_types::token::{HmacSessionSigner, SessionClaims, SessionSigner};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Identity and validity window baked into a test token.
pub struct MockSession {
    pub subject_id: Uuid,
    pub issued_at: u64,
    pub expires_at: u64,
}

impl MockSession {
    pub fn new(subject_id: Uuid, issued_at: u64, expires_at: u64) -> Self {
        Self {
            subject_id,
            issued_at,
            expires_at,
        }
    }

    pub fn signer() -> HmacSessionSigner {
        HmacSessionSigner::new(TEST_JWT_SECRET)
    }

    pub fn token(&self) -> String {
        let claims = SessionClaims {
            sub: self.subject_id.to_string(),
            iat: self.issued_at,
            exp: self.expires_at,
        };
        Self::signer().sign(&claims).unwrap()
    }

    /// `Authorization: Bearer <token>` as a client would send it.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token())).unwrap(),
        );
        map
    }
}
