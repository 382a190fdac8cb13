use std::path::PathBuf;
use std::sync::Arc;

use chrono::Duration;
use sea_orm::DatabaseConnection;

use abha_core::clock::Clock;

use crate::infra::blob::DiskBlobStore;
use crate::infra::db::DbUserDirectory;
use crate::infra::delivery::LogOtpDelivery;
use crate::infra::otp::OtpBackend;
use crate::infra::password::Argon2PasswordHasher;
use crate::relay::broadcast::BroadcastRelay;
use crate::usecase::session::SessionMinter;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub otp_store: OtpBackend,
    pub otp_ttl: Duration,
    pub minter: SessionMinter,
    pub relay: BroadcastRelay,
    pub clock: Arc<dyn Clock>,
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn user_directory(&self) -> DbUserDirectory {
        DbUserDirectory {
            db: self.db.clone(),
        }
    }

    pub fn password_hasher(&self) -> Argon2PasswordHasher {
        Argon2PasswordHasher
    }

    pub fn otp_delivery(&self) -> LogOtpDelivery {
        LogOtpDelivery
    }

    pub fn blob_store(&self) -> DiskBlobStore {
        DiskBlobStore {
            root: self.upload_dir.clone(),
        }
    }
}
