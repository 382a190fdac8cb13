use std::path::PathBuf;

use anyhow::Context as _;
use uuid::Uuid;

use crate::domain::repository::BlobStore;
use crate::domain::types::{BlobRef, UploadedFile};
use crate::error::ApiServiceError;

/// Writes each upload to `root/<random id>`. The client's file name is kept
/// only as metadata, never used as a path.
#[derive(Debug, Clone)]
pub struct DiskBlobStore {
    pub root: PathBuf,
}

impl BlobStore for DiskBlobStore {
    async fn store(&self, file: UploadedFile) -> Result<BlobRef, ApiServiceError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("create upload dir {}", self.root.display()))?;

        let id = Uuid::new_v4().simple().to_string();
        let path = self.root.join(&id);
        tokio::fs::write(&path, &file.data)
            .await
            .with_context(|| format!("write upload {}", path.display()))?;

        Ok(BlobRef {
            id,
            original_name: file.original_name,
            size: file.data.len() as u64,
        })
    }
}
