use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::UserRecord;
use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::user::{RegisterUserInput, RegisterUserUseCase};

/// Public view of a directory user. The password hash never leaves the service.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abha_id: Option<String>,
    #[serde(serialize_with = "abha_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for UserResponse {
    fn from(user: UserRecord) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            abha_id: user.abha_id,
            created_at: user.created_at,
        }
    }
}

// ── POST /register ───────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default, rename = "abhaId", alias = "abha_id")]
    pub abha_id: Option<String>,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiServiceError> {
    let usecase = RegisterUserUseCase {
        users: state.user_directory(),
        hasher: state.password_hasher(),
    };

    let user = usecase
        .execute(RegisterUserInput {
            username: body.username,
            email: body.email,
            password: body.password,
            abha_id: body.abha_id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration successful",
            user: user.into(),
        }),
    ))
}
