use axum::extract::State;
use axum::http::StatusCode;

use abha_core::health::readiness_status;

use crate::state::AppState;

// ── GET /readyz ──────────────────────────────────────────────────────────────

pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness_status(state.db.ping().await)
}
