use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use abha_core::health::healthz;
use abha_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    chat::ws_handler,
    health::readyz,
    otp::{send_otp, verify_otp},
    session::check_session,
    upload::upload,
    user::register,
};
use crate::state::AppState;

/// CORS policy for browser clients. An empty list allows any origin.
pub fn cors_layer(allowed_origins: Vec<HeaderValue>) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::permissive();
    }
    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn build_router(state: AppState, max_upload_bytes: usize, cors: CorsLayer) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Users
        .route("/register", post(register))
        // OTP login
        .route("/send-otp", post(send_otp))
        .route("/verify-otp", post(verify_otp))
        // Session
        .route("/session", get(check_session))
        // Uploads
        .route(
            "/upload",
            post(upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        // Real-time relay
        .route("/ws", get(ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(trace_layer())
                .layer(propagate_request_id_layer())
                .layer(cors),
        )
        .with_state(state)
}
