use std::sync::Arc;

use sea_orm::Database;
use tracing::info;

use abha_api::config::ApiConfig;
use abha_api::infra::otp::OtpBackend;
use abha_api::infra::otp_memory::{MemoryOtpStore, spawn_sweeper};
use abha_api::infra::otp_redis::RedisOtpStore;
use abha_api::relay::broadcast::BroadcastRelay;
use abha_api::relay::registry::ConnectionRegistry;
use abha_api::router::{build_router, cors_layer};
use abha_api::state::AppState;
use abha_api::usecase::session::SessionMinter;
use abha_auth_types::token::HmacSessionSigner;
use abha_core::clock::{Clock, SystemClock};
use abha_core::config::Config;
use abha_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing("info");

    let config = ApiConfig::from_env();
    config.validate().expect("invalid configuration");
    info!(?config, "configuration loaded");

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let otp_store = match &config.redis_url {
        Some(url) => {
            let pool = deadpool_redis::Config::from_url(url)
                .create_pool(Some(deadpool_redis::Runtime::Tokio1))
                .expect("failed to create Redis pool");
            info!("otp store: redis");
            OtpBackend::Redis(RedisOtpStore {
                pool,
                max_attempts: config.otp_max_attempts,
            })
        }
        None => {
            let store = MemoryOtpStore::new(clock.clone(), config.otp_max_attempts);
            if let Some(period) = config.otp_sweep_interval() {
                spawn_sweeper(store.clone(), period);
            }
            info!("otp store: in-process memory");
            OtpBackend::Memory(store)
        }
    };

    let signer = HmacSessionSigner::new(&config.jwt_secret);
    let minter = SessionMinter::new(Arc::new(signer), config.session_ttl());

    let state = AppState {
        db,
        otp_store,
        otp_ttl: config.otp_ttl(),
        minter,
        relay: BroadcastRelay::new(ConnectionRegistry::new(clock.clone())),
        clock,
        upload_dir: config.upload_dir.clone(),
    };

    let cors = cors_layer(config.cors_origins().expect("invalid CORS_ALLOWED_ORIGINS"));
    let router = build_router(state, config.max_upload_bytes, cors);
    let addr = format!("0.0.0.0:{}", config.api_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("api service listening on {addr}");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
