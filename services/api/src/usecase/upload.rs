use crate::domain::repository::BlobStore;
use crate::domain::types::{BlobRef, UploadedFile};
use crate::error::ApiServiceError;

pub struct StoreUploadUseCase<B: BlobStore> {
    pub blobs: B,
}

impl<B: BlobStore> StoreUploadUseCase<B> {
    pub async fn execute(&self, file: Option<UploadedFile>) -> Result<BlobRef, ApiServiceError> {
        let file = file.ok_or(ApiServiceError::NoFileUploaded)?;
        let blob = self.blobs.store(file).await?;
        tracing::info!(blob_id = %blob.id, size = blob.size, "file uploaded");
        Ok(blob)
    }
}
