use std::fmt;
use std::path::PathBuf;

use axum::http::HeaderValue;
use chrono::Duration;
use serde::Deserialize;

use abha_core::config::Config;

use crate::domain::types::DEFAULT_SESSION_TTL_SECS;

/// Upper bound for `OTP_TTL_SECS` and `SESSION_TTL_SECS` (366 days).
pub const MAX_TTL_SECS: u64 = 366 * 24 * 60 * 60;

/// API service configuration loaded from environment variables.
#[derive(Deserialize)]
pub struct ApiConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for signing session tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// Lifetime of an issued OTP in seconds. Required, no default. Env var: `OTP_TTL_SECS`.
    pub otp_ttl_secs: u64,
    /// Session token validity window in seconds (default 3600). Env var: `SESSION_TTL_SECS`.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// TCP port to listen on (default 5000). Env var: `API_PORT`.
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Redis URL for a shared OTP store. Unset keeps OTPs in process memory.
    #[serde(default)]
    pub redis_url: Option<String>,
    /// Wrong codes tolerated per OTP before it is dropped. Unset means no limit.
    #[serde(default)]
    pub otp_max_attempts: Option<u32>,
    /// Period of the in-memory expiry sweep in seconds (default 60, 0 disables).
    #[serde(default = "default_otp_sweep_interval_secs")]
    pub otp_sweep_interval_secs: u64,
    /// Directory uploads are written to (default `uploads`).
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    /// Request body limit for `POST /upload` in bytes (default 10 MiB).
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Origins allowed to call the API from a browser, comma separated.
    /// Unset allows any origin. Env var: `CORS_ALLOWED_ORIGINS`.
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

fn default_session_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

fn default_api_port() -> u16 {
    5000
}

fn default_otp_sweep_interval_secs() -> u64 {
    60
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

impl Config for ApiConfig {}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("JWT_SECRET must not be empty")]
    EmptySecret,
    #[error("OTP_TTL_SECS must be greater than zero")]
    ZeroOtpTtl,
    #[error("SESSION_TTL_SECS must be greater than zero")]
    ZeroSessionTtl,
    #[error("OTP_MAX_ATTEMPTS must be greater than zero when set")]
    ZeroMaxAttempts,
    #[error("{0} must not exceed 366 days")]
    TtlTooLarge(&'static str),
    #[error("CORS_ALLOWED_ORIGINS contains an invalid origin: {0}")]
    InvalidCorsOrigin(String),
}

impl ApiConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if self.otp_ttl_secs == 0 {
            return Err(ConfigError::ZeroOtpTtl);
        }
        if self.session_ttl_secs == 0 {
            return Err(ConfigError::ZeroSessionTtl);
        }
        if self.otp_ttl_secs > MAX_TTL_SECS {
            return Err(ConfigError::TtlTooLarge("OTP_TTL_SECS"));
        }
        if self.session_ttl_secs > MAX_TTL_SECS {
            return Err(ConfigError::TtlTooLarge("SESSION_TTL_SECS"));
        }
        if self.otp_max_attempts == Some(0) {
            return Err(ConfigError::ZeroMaxAttempts);
        }
        self.cors_origins()?;
        Ok(())
    }

    /// OTP lifetime, clamped to [`MAX_TTL_SECS`].
    pub fn otp_ttl(&self) -> Duration {
        bounded_secs(self.otp_ttl_secs)
    }

    /// Session validity window, clamped to [`MAX_TTL_SECS`].
    pub fn session_ttl(&self) -> Duration {
        bounded_secs(self.session_ttl_secs)
    }

    pub fn cors_origins(&self) -> Result<Vec<HeaderValue>, ConfigError> {
        self.cors_allowed_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(|origin| {
                HeaderValue::from_str(origin)
                    .map_err(|_| ConfigError::InvalidCorsOrigin(origin.to_owned()))
            })
            .collect()
    }

    pub fn otp_sweep_interval(&self) -> Option<std::time::Duration> {
        (self.otp_sweep_interval_secs > 0)
            .then(|| std::time::Duration::from_secs(self.otp_sweep_interval_secs))
    }
}

fn bounded_secs(secs: u64) -> Duration {
    // MAX_TTL_SECS fits in i64 with room to spare
    Duration::seconds(secs.min(MAX_TTL_SECS) as i64)
}

impl fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiConfig")
            .field("database_url", &"<redacted>")
            .field("jwt_secret", &"<redacted>")
            .field("otp_ttl_secs", &self.otp_ttl_secs)
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("api_port", &self.api_port)
            .field("redis_url", &self.redis_url.as_ref().map(|_| "<redacted>"))
            .field("otp_max_attempts", &self.otp_max_attempts)
            .field("otp_sweep_interval_secs", &self.otp_sweep_interval_secs)
            .field("upload_dir", &self.upload_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}
