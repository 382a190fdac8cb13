use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Smallest code the issuer hands out.
pub const OTP_MIN: u32 = 100_000;

/// Largest code the issuer hands out (inclusive).
pub const OTP_MAX: u32 = 999_999;

/// Session validity window when `SESSION_TTL_SECS` is not set.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 3600;

/// Pending one-time passcode for an identity.
///
/// Consuming a record removes it from the store, so a record that can still be
/// read has never been consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpRecord {
    pub identity: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Wrong codes presented against this record so far.
    pub failed_attempts: u32,
}

impl OtpRecord {
    /// A `ttl` reaching past the representable range saturates at
    /// `DateTime::<Utc>::MAX_UTC`.
    pub fn new(identity: &str, code: &str, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            identity: identity.to_owned(),
            code: code.to_owned(),
            created_at: now,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
            failed_attempts: 0,
        }
    }

    /// Expired strictly after `expires_at`; a code presented at exactly
    /// `expires_at` is still accepted.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Result of presenting a code to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsumeOutcome {
    /// Code matched an unexpired record; the record is gone.
    Consumed,
    /// No record for the identity.
    NotFound,
    /// Record existed but had expired; it has been removed.
    Expired,
    /// Record exists and is unexpired but the code differs. The record stays
    /// unless the configured attempt limit was just reached.
    Mismatch,
}

/// User as stored in the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub abha_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new directory entry. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub abha_id: Option<String>,
}

/// Signed session credential handed to the client after OTP login.
#[derive(Debug, Clone)]
pub struct SessionToken {
    pub token: String,
    pub subject_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// File received from a client, before it reaches the blob store.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub original_name: Option<String>,
    pub data: Bytes,
}

/// Reference to a stored upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    pub id: String,
    pub original_name: Option<String>,
    pub size: u64,
}
