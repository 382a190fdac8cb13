use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderValue, Method, Request, StatusCode, header};
use axum::response::Response;
use chrono::{DateTime, Duration, Utc};
use sea_orm::DatabaseConnection;
use tower::ServiceExt;
use uuid::Uuid;

use abha_api::infra::otp::OtpBackend;
use abha_api::infra::otp_memory::MemoryOtpStore;
use abha_api::relay::broadcast::BroadcastRelay;
use abha_api::relay::registry::ConnectionRegistry;
use abha_api::router::{build_router, cors_layer};
use abha_api::state::AppState;
use abha_api::usecase::session::SessionMinter;
use abha_auth_types::token::HmacSessionSigner;
use abha_core::clock::Clock;
use abha_testing::auth::{MockSession, TEST_JWT_SECRET};
use abha_testing::clock::ManualClock;

use crate::helpers::{memory_store, otp_ttl};

const MAX_UPLOAD: usize = 1024 * 1024;
const BOUNDARY: &str = "abha-test-boundary";

/// State with no database behind it; only routes that skip the directory work.
fn test_state(clock: &ManualClock, store: &MemoryOtpStore, upload_dir: &Path) -> AppState {
    let clock: Arc<dyn Clock> = Arc::new(clock.clone());
    AppState {
        db: DatabaseConnection::Disconnected,
        otp_store: OtpBackend::Memory(store.clone()),
        otp_ttl: otp_ttl(),
        minter: SessionMinter::new(
            Arc::new(HmacSessionSigner::new(TEST_JWT_SECRET)),
            Duration::hours(1),
        ),
        relay: BroadcastRelay::new(ConnectionRegistry::new(clock.clone())),
        clock,
        upload_dir: upload_dir.to_path_buf(),
    }
}

fn app(clock: &ManualClock, store: &MemoryOtpStore, upload_dir: &Path) -> Router {
    build_router(
        test_state(clock, store, upload_dir),
        MAX_UPLOAD,
        cors_layer(vec![]),
    )
}

async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
    let mut body = String::new();
    for (name, file_name, content) in parts {
        body.push_str(&format!("--{BOUNDARY}\r\n"));
        match file_name {
            Some(file_name) => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )),
            None => body.push_str(&format!(
                "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
            )),
        }
        body.push_str(content);
        body.push_str("\r\n");
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));

    Request::builder()
        .method(Method::POST)
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

// ── CORS ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_cors_preflight_for_any_origin() {
    let clock = ManualClock::epoch();
    let dir = tempfile::tempdir().unwrap();
    let app = app(&clock, &memory_store(&clock), dir.path());

    let resp = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/send-otp")
                .header(header::ORIGIN, "https://frontend.example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[tokio::test]
async fn should_only_allow_configured_origins() {
    let clock = ManualClock::epoch();
    let dir = tempfile::tempdir().unwrap();
    let allowed = HeaderValue::from_static("https://app.example.com");
    let app = build_router(
        test_state(&clock, &memory_store(&clock), dir.path()),
        MAX_UPLOAD,
        cors_layer(vec![allowed.clone()]),
    );

    let request = |origin: &'static str| {
        Request::builder()
            .uri("/healthz")
            .header(header::ORIGIN, origin)
            .body(Body::empty())
            .unwrap()
    };

    let resp = app.clone().oneshot(request("https://app.example.com")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&allowed)
    );

    let resp = app.oneshot(request("https://evil.example.com")).await.unwrap();
    assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_stamp_request_id_on_healthz() {
    let clock = ManualClock::epoch();
    let dir = tempfile::tempdir().unwrap();
    let resp = app(&clock, &memory_store(&clock), dir.path())
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let id = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(Uuid::parse_str(id).is_ok());
}

#[tokio::test]
async fn should_report_not_ready_without_database() {
    let clock = ManualClock::epoch();
    let dir = tempfile::tempdir().unwrap();
    let resp = app(&clock, &memory_store(&clock), dir.path())
        .oneshot(Request::builder().uri("/readyz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

// ── POST /send-otp ───────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_code_on_send_otp() {
    let clock = ManualClock::epoch();
    let store = memory_store(&clock);
    let dir = tempfile::tempdir().unwrap();

    let resp = app(&clock, &store, dir.path())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/send-otp")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"email":"a@example.com"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["message"], "OTP sent successfully");
    let record = store.get("a@example.com").unwrap();
    assert_eq!(record.expires_at, clock.now() + otp_ttl());
}

#[tokio::test]
async fn should_reject_wrong_code_before_touching_directory() {
    let clock = ManualClock::epoch();
    let store = memory_store(&clock);
    store.insert("a@example.com", "123456", otp_ttl());
    let dir = tempfile::tempdir().unwrap();

    let resp = app(&clock, &store, dir.path())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/verify-otp")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"email":"a@example.com","otp":"000000"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["kind"], "INVALID_OTP");
    assert!(store.get("a@example.com").is_some());
}

// ── GET /session ─────────────────────────────────────────────────────────────

fn session_request(session: &MockSession) -> Request<Body> {
    let mut request = Request::builder()
        .uri("/session")
        .body(Body::empty())
        .unwrap();
    *request.headers_mut() = session.headers();
    request
}

#[tokio::test]
async fn should_describe_valid_bearer_session() {
    let clock = ManualClock::epoch();
    let dir = tempfile::tempdir().unwrap();
    let now = clock.now().timestamp() as u64;
    let subject = Uuid::new_v4();
    let session = MockSession::new(subject, now, now + 3600);

    let resp = app(&clock, &memory_store(&clock), dir.path())
        .oneshot(session_request(&session))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["subject_id"], subject.to_string());
    assert_eq!(json["issued_at"], "2024-01-01T00:00:00.000Z");
    assert_eq!(json["expires_at"], "2024-01-01T01:00:00.000Z");
}

#[tokio::test]
async fn should_reject_bearer_session_at_expiry() {
    let clock = ManualClock::epoch();
    let dir = tempfile::tempdir().unwrap();
    let now = clock.now().timestamp() as u64;
    let session = MockSession::new(Uuid::new_v4(), now, now + 60);
    let app = app(&clock, &memory_store(&clock), dir.path());

    clock.set(DateTime::<Utc>::from_timestamp((now + 60) as i64, 0).unwrap());
    let resp = app.oneshot(session_request(&session)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["kind"], "INVALID_TOKEN");
}

#[tokio::test]
async fn should_reject_missing_bearer() {
    let clock = ManualClock::epoch();
    let dir = tempfile::tempdir().unwrap();
    let resp = app(&clock, &memory_store(&clock), dir.path())
        .oneshot(Request::builder().uri("/session").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ── POST /upload ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_multipart_file_field() {
    let clock = ManualClock::epoch();
    let dir = tempfile::tempdir().unwrap();

    let resp = app(&clock, &memory_store(&clock), dir.path())
        .oneshot(multipart(&[
            ("note", None, "ignored"),
            ("file", Some("report.txt"), "lab results"),
        ]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["message"], "File uploaded successfully");
    assert_eq!(json["file"]["original_name"], "report.txt");
    assert_eq!(json["file"]["size"], 11);
    let id = json["file"]["id"].as_str().unwrap();
    assert_eq!(std::fs::read(dir.path().join(id)).unwrap(), b"lab results");
}

#[tokio::test]
async fn should_reject_upload_without_file_field() {
    let clock = ManualClock::epoch();
    let dir = tempfile::tempdir().unwrap();

    let resp = app(&clock, &memory_store(&clock), dir.path())
        .oneshot(multipart(&[("note", None, "no attachment")]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["kind"], "NO_FILE_UPLOADED");
}
