use std::fmt::Display;

use axum::http::StatusCode;

/// Handler for `GET /healthz`: the process is up and serving.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Map the outcome of a readiness probe (database ping, cache ping) to the
/// status returned by `GET /readyz`.
pub fn readiness_status<E: Display>(probe: Result<(), E>) -> StatusCode {
    match probe {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
