use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiServiceError;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::otp::{IssueOtpInput, IssueOtpUseCase, VerifyOtpUseCase};
use crate::usecase::session::{CreateSessionInput, CreateSessionUseCase};

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ── POST /send-otp ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
}

pub async fn send_otp(
    State(state): State<AppState>,
    Json(body): Json<SendOtpRequest>,
) -> Result<impl IntoResponse, ApiServiceError> {
    let usecase = IssueOtpUseCase {
        store: state.otp_store.clone(),
        delivery: state.otp_delivery(),
        ttl: state.otp_ttl,
    };

    usecase
        .execute(IssueOtpInput {
            identity: body.email,
        })
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "OTP sent successfully",
        }),
    ))
}

// ── POST /verify-otp ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub token: String,
    #[serde(serialize_with = "abha_core::serde::to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

pub async fn verify_otp(
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<impl IntoResponse, ApiServiceError> {
    let usecase = CreateSessionUseCase {
        verifier: VerifyOtpUseCase {
            store: state.otp_store.clone(),
            users: state.user_directory(),
        },
        minter: state.minter.clone(),
        clock: state.clock.clone(),
    };

    let output = usecase
        .execute(CreateSessionInput {
            identity: body.email,
            code: body.otp,
        })
        .await?;

    Ok((
        StatusCode::OK,
        Json(LoginResponse {
            message: "Login successful",
            token: output.session.token,
            expires_at: output.session.expires_at,
            user: output.user.into(),
        }),
    ))
}
