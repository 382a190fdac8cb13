#![allow(async_fn_in_trait)]

use chrono::Duration;

use crate::domain::types::{BlobRef, ConsumeOutcome, NewUser, UploadedFile, UserRecord};
use crate::error::{ApiServiceError, DeliveryError};

/// Ephemeral storage of pending one-time passcodes, at most one per identity.
///
/// Each call is atomic on its own; callers never hold a lock across calls.
pub trait OtpStore: Send + Sync {
    /// Insert or overwrite the record for `identity`, expiring `ttl` from now.
    async fn put(&self, identity: &str, code: &str, ttl: Duration) -> Result<(), ApiServiceError>;

    /// Check `code` against the record for `identity`, removing it on a match.
    ///
    /// Two concurrent calls with the same valid code yield exactly one
    /// [`ConsumeOutcome::Consumed`].
    async fn try_consume(
        &self,
        identity: &str,
        code: &str,
    ) -> Result<ConsumeOutcome, ApiServiceError>;
}

/// Out-of-band channel (email, SMS) that hands a code to its owner.
pub trait OtpDelivery: Send + Sync {
    async fn deliver(&self, identity: &str, code: &str) -> Result<(), DeliveryError>;
}

/// Durable user directory.
pub trait UserDirectory: Send + Sync {
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, ApiServiceError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, ApiServiceError>;
}

/// One-way credential hashing.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, plaintext: &str) -> Result<String, ApiServiceError>;
    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, ApiServiceError>;
}

/// Opaque storage for uploaded files.
pub trait BlobStore: Send + Sync {
    async fn store(&self, file: UploadedFile) -> Result<BlobRef, ApiServiceError>;
}
