use axum::{
    Json,
    extract::{Multipart, State},
    response::IntoResponse,
};
use serde::Serialize;

use crate::domain::types::{BlobRef, UploadedFile};
use crate::error::ApiServiceError;
use crate::state::AppState;
use crate::usecase::upload::StoreUploadUseCase;

const FILE_FIELD: &str = "file";

// ── POST /upload ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct FileResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    pub size: u64,
}

impl From<BlobRef> for FileResponse {
    fn from(blob: BlobRef) -> Self {
        Self {
            id: blob.id,
            original_name: blob.original_name,
            size: blob.size,
        }
    }
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub message: &'static str,
    pub file: FileResponse,
}

/// First multipart field named `file`. Other fields are drained and ignored.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, ApiServiceError> {
    let invalid = |e: axum::extract::multipart::MultipartError| {
        tracing::debug!(error = %e, "malformed multipart body");
        ApiServiceError::InvalidUpload
    };

    while let Some(field) = multipart.next_field().await.map_err(invalid)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let original_name = field.file_name().map(str::to_owned);
        let data = field.bytes().await.map_err(invalid)?;
        return Ok(Some(UploadedFile {
            original_name,
            data,
        }));
    }
    Ok(None)
}

pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiServiceError> {
    let file = read_file_field(&mut multipart).await?;

    let usecase = StoreUploadUseCase {
        blobs: state.blob_store(),
    };
    let blob = usecase.execute(file).await?;

    Ok(Json(UploadResponse {
        message: "File uploaded successfully",
        file: blob.into(),
    }))
}
