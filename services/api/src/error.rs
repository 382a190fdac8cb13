use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// API service error variants.
///
/// Callers see a stable `kind` and a deliberately vague message; the variant
/// itself is precise enough for logs and tests.
#[derive(Debug, thiserror::Error)]
pub enum ApiServiceError {
    /// Wrong code, expired code, or no pending code. Not distinguished to the caller.
    #[error("invalid otp")]
    InvalidOtp,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid token")]
    InvalidToken,
    #[error("error registering user")]
    RegistrationFailed(#[source] anyhow::Error),
    #[error("no file uploaded")]
    NoFileUploaded,
    #[error("invalid upload")]
    InvalidUpload,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidOtp => "INVALID_OTP",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::RegistrationFailed(_) => "REGISTRATION_FAILED",
            Self::NoFileUploaded => "NO_FILE_UPLOADED",
            Self::InvalidUpload => "INVALID_UPLOAD",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for ApiServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidOtp | Self::UserNotFound | Self::NoFileUploaded | Self::InvalidUpload => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::RegistrationFailed(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // 4xx are expected client errors and already visible in the request trace.
        // 5xx carry an anyhow chain that must reach the logs.
        match &self {
            Self::RegistrationFailed(e) | Self::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), kind = self.kind(), "request failed");
            }
            _ => {}
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

/// Out-of-band delivery failed. Logged by the issuer, never surfaced to the client.
#[derive(Debug, thiserror::Error)]
#[error("otp delivery failed: {0}")]
pub struct DeliveryError(pub String);
