//! The remote half of an upload: store the blob, resolve its public URL,
//! then persist the metadata row. Each stage returns a stage-tagged
//! [`WorkflowError`] and the first failure ends the run. Nothing is rolled
//! back: a blob whose row failed to persist stays in the bucket.

use bytes::Bytes;
use pdfdrop_catalog::{MetadataStore, NewPdfFile, PdfFile};
use pdfdrop_engine::{PutObjectRequest, StorageEngine, StoredObject, DEFAULT_CACHE_CONTROL_SECS};

use crate::error::{WorkflowError, WorkflowResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSettings {
    pub bucket: String,
    pub cache_control_secs: u32,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            bucket: "pdfs".to_string(),
            cache_control_secs: DEFAULT_CACHE_CONTROL_SECS,
        }
    }
}

/// Everything the remote stages need, captured at submission time.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub path: String,
    pub original_name: String,
    pub custom_name: String,
    pub year: i32,
    pub doc_type: String,
    pub size: u64,
    pub content_type: String,
    pub contents: Bytes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadOutcome {
    pub stored: StoredObject,
    pub public_url: String,
    pub record: PdfFile,
}

pub async fn store_blob<S: StorageEngine>(
    storage: &S,
    settings: &UploadSettings,
    request: &UploadRequest,
) -> WorkflowResult<StoredObject> {
    let put = PutObjectRequest {
        bucket: settings.bucket.clone(),
        key: request.path.clone(),
        content_type: request.content_type.clone(),
        cache_control_secs: settings.cache_control_secs,
        data: request.contents.clone(),
    };

    storage.put_object(put).await.map_err(|e| {
        tracing::error!(path = %request.path, "Storage failed: {}", e);
        WorkflowError::Storage(e.to_string())
    })
}

pub async fn fetch_url<S: StorageEngine>(
    storage: &S,
    stored: &StoredObject,
) -> WorkflowResult<String> {
    storage
        .public_url(&stored.bucket, &stored.key)
        .await
        .ok_or_else(|| {
            tracing::error!(key = %stored.key, "No public URL for stored object");
            WorkflowError::UrlGeneration
        })
}

pub async fn persist_record<M: MetadataStore>(
    catalog: &M,
    request: &UploadRequest,
    public_url: &str,
) -> WorkflowResult<PdfFile> {
    let record = NewPdfFile {
        filename: request.path.clone(),
        original_name: request.original_name.clone(),
        name: request.custom_name.clone(),
        year: request.year,
        doc_type: request.doc_type.clone(),
        file_size: request.size as i64,
        file_url: public_url.to_string(),
    };

    catalog.insert(record).await.map_err(|e| {
        tracing::error!(path = %request.path, "Persisting metadata failed: {:#}", e);
        WorkflowError::Persistence(format!("{:#}", e))
    })
}

pub async fn run<S: StorageEngine, M: MetadataStore>(
    storage: &S,
    catalog: &M,
    settings: &UploadSettings,
    request: &UploadRequest,
) -> WorkflowResult<UploadOutcome> {
    tracing::info!(path = %request.path, size = request.size, "Starting upload");

    let stored = store_blob(storage, settings, request).await?;
    let public_url = fetch_url(storage, &stored).await?;
    let record = persist_record(catalog, request, &public_url).await?;

    tracing::info!(path = %request.path, id = %record.id, "Upload complete");

    Ok(UploadOutcome {
        stored,
        public_url,
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeCatalog, FakeStorage};

    fn request() -> UploadRequest {
        UploadRequest {
            path: "1700000000000-Report.pdf".to_string(),
            original_name: "Report.pdf".to_string(),
            custom_name: "Report".to_string(),
            year: 2,
            doc_type: "exam".to_string(),
            size: 4,
            content_type: "application/pdf".to_string(),
            contents: Bytes::from_static(b"%PDF"),
        }
    }

    #[tokio::test]
    async fn runs_all_stages_in_order() {
        let storage = FakeStorage::default();
        let catalog = FakeCatalog::default();

        let outcome = run(&storage, &catalog, &UploadSettings::default(), &request())
            .await
            .unwrap();

        assert_eq!(outcome.public_url, "https://cdn.test/pdfs/1700000000000-Report.pdf");
        assert_eq!(outcome.record.file_url, outcome.public_url);
        assert_eq!(outcome.record.filename, "1700000000000-Report.pdf");

        let puts = storage.puts();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].bucket, "pdfs");
        assert_eq!(puts[0].cache_control_secs, 3600);
        assert_eq!(puts[0].content_type, "application/pdf");

        let inserts = catalog.inserts();
        assert_eq!(inserts.len(), 1);
        assert_eq!(inserts[0].year, 2);
        assert_eq!(inserts[0].file_size, 4);
    }

    #[tokio::test]
    async fn storage_failure_skips_later_stages() {
        let storage = FakeStorage::failing("bucket offline");
        let catalog = FakeCatalog::default();

        let err = run(&storage, &catalog, &UploadSettings::default(), &request())
            .await
            .unwrap_err();

        assert_eq!(err, WorkflowError::Storage("bucket offline".to_string()));
        assert_eq!(err.to_string(), "Upload error: bucket offline");
        assert!(catalog.inserts().is_empty());
    }

    #[tokio::test]
    async fn missing_url_is_its_own_failure() {
        let storage = FakeStorage::without_urls();
        let catalog = FakeCatalog::default();

        let err = run(&storage, &catalog, &UploadSettings::default(), &request())
            .await
            .unwrap_err();

        assert_eq!(err, WorkflowError::UrlGeneration);
        assert!(catalog.inserts().is_empty());
    }

    #[tokio::test]
    async fn persistence_failure_leaves_blob_stored() {
        let storage = FakeStorage::default();
        let catalog = FakeCatalog::failing("duplicate key");

        let err = run(&storage, &catalog, &UploadSettings::default(), &request())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Database error: duplicate key");
        assert_eq!(storage.puts().len(), 1);
    }
}
