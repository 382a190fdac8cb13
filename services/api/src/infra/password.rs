//! Argon2id password hashing.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};

use crate::domain::repository::PasswordHasher;
use crate::error::ApiServiceError;

/// Argon2id with default parameters and a random salt per hash. Digests are
/// PHC strings, so parameters travel with the hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<String, ApiServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
        Ok(hash.to_string())
    }

    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, ApiServiceError> {
        let parsed = PasswordHash::new(digest).map_err(|e| anyhow::anyhow!("parse digest: {e}"))?;
        Ok(Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok())
    }
}
