use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use uuid::Uuid;

use abha_auth_types::bearer::BearerToken;

use crate::error::ApiServiceError;
use crate::state::AppState;

// ── GET /session ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionResponse {
    pub subject_id: Uuid,
    #[serde(serialize_with = "abha_core::serde::unix_secs_to_rfc3339")]
    pub issued_at: u64,
    #[serde(serialize_with = "abha_core::serde::unix_secs_to_rfc3339")]
    pub expires_at: u64,
}

pub async fn check_session(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<impl IntoResponse, ApiServiceError> {
    let info = state.minter.validate(&token, state.clock.now())?;

    Ok(Json(SessionResponse {
        subject_id: info.subject_id,
        issued_at: info.issued_at,
        expires_at: info.expires_at,
    }))
}
