use bytes::Bytes;

use abha_api::domain::types::UploadedFile;
use abha_api::error::ApiServiceError;
use abha_api::infra::blob::DiskBlobStore;
use abha_api::usecase::upload::StoreUploadUseCase;

use crate::helpers::MockBlobStore;

#[tokio::test]
async fn should_store_uploaded_file() {
    let blobs = MockBlobStore::default();
    let usecase = StoreUploadUseCase {
        blobs: blobs.clone(),
    };

    let blob = usecase
        .execute(Some(UploadedFile {
            original_name: Some("scan.png".to_owned()),
            data: Bytes::from_static(b"\x89PNG"),
        }))
        .await
        .unwrap();

    assert_eq!(blob.size, 4);
    assert_eq!(blob.original_name.as_deref(), Some("scan.png"));
    assert_eq!(blobs.stored.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn should_reject_missing_file() {
    let blobs = MockBlobStore::default();
    let usecase = StoreUploadUseCase {
        blobs: blobs.clone(),
    };

    let result = usecase.execute(None).await;
    assert!(matches!(result, Err(ApiServiceError::NoFileUploaded)), "got {result:?}");
    assert!(blobs.stored.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_write_to_disk_store() {
    let dir = tempfile::tempdir().unwrap();
    let usecase = StoreUploadUseCase {
        blobs: DiskBlobStore {
            root: dir.path().to_path_buf(),
        },
    };

    let blob = usecase
        .execute(Some(UploadedFile {
            original_name: None,
            data: Bytes::from_static(b"report"),
        }))
        .await
        .unwrap();

    let written = std::fs::read(dir.path().join(&blob.id)).unwrap();
    assert_eq!(written, b"report");
}
