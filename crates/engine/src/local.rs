use md5::{Digest, Md5};
use std::path::{Component, Path, PathBuf};
use tokio::{fs, io::AsyncWriteExt};
use uuid::Uuid;

use crate::{traits::*, StorageConfig};

#[derive(Debug, Clone)]
pub struct LocalStorageEngine {
    config: StorageConfig,
}

impl LocalStorageEngine {
    pub fn new(config: StorageConfig) -> StorageResult<Self> {
        std::fs::create_dir_all(&config.data_dir)?;
        std::fs::create_dir_all(&config.temp_dir)?;

        Ok(Self { config })
    }

    fn object_path(&self, bucket: &str, key: &str) -> StorageResult<PathBuf> {
        validate_segment(bucket)?;
        validate_segment(key)?;
        Ok(self.config.data_dir.join(bucket).join(key))
    }

    fn temp_path(&self) -> PathBuf {
        self.config.temp_dir.join(format!("tmp_{}", Uuid::new_v4()))
    }

    /// Whether an object is stored under `bucket`/`key`.
    pub async fn contains(&self, bucket: &str, key: &str) -> StorageResult<bool> {
        let object_path = self.object_path(bucket, key)?;
        Ok(fs::try_exists(&object_path).await?)
    }

    async fn ensure_bucket_dir(&self, bucket: &str) -> StorageResult<()> {
        let bucket_dir = self.config.data_dir.join(bucket);
        fs::create_dir_all(&bucket_dir).await?;
        Ok(())
    }
}

fn validate_segment(key: &str) -> StorageResult<()> {
    let path = Path::new(key);
    let well_formed = !key.is_empty()
        && path.components().all(|c| matches!(c, Component::Normal(_)));

    if well_formed {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

impl StorageEngine for LocalStorageEngine {
    async fn put_object(&self, request: PutObjectRequest) -> StorageResult<StoredObject> {
        let object_path = self.object_path(&request.bucket, &request.key)?;
        self.ensure_bucket_dir(&request.bucket).await?;

        if let Some(parent) = object_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Write to temporary file first
        let temp_path = self.temp_path();
        let mut temp_file = fs::File::create(&temp_path).await?;
        temp_file.write_all(&request.data).await?;
        temp_file.sync_all().await?;
        drop(temp_file);

        // hard_link fails when the target exists, so the check and the
        // placement are a single step.
        let placed = fs::hard_link(&temp_path, &object_path).await;
        let _ = fs::remove_file(&temp_path).await;

        if let Err(e) = placed {
            if e.kind() == std::io::ErrorKind::AlreadyExists {
                return Err(StorageError::AlreadyExists(request.key));
            }
            return Err(e.into());
        }

        let etag = format!("{:x}", Md5::digest(&request.data));
        tracing::debug!(bucket = %request.bucket, key = %request.key, %etag, "Stored object");

        Ok(StoredObject {
            bucket: request.bucket,
            key: request.key,
            size: request.data.len() as u64,
            etag: Some(etag),
        })
    }

    async fn public_url(&self, bucket: &str, key: &str) -> Option<String> {
        match self.contains(bucket, key).await {
            Ok(true) => {}
            Ok(false) => return None,
            Err(e) => {
                tracing::warn!("Failed to inspect {}/{}: {}", bucket, key, e);
                return None;
            }
        }

        match &self.config.public_base_url {
            Some(base) => Some(format!("{}/{}/{}", base.trim_end_matches('/'), bucket, key)),
            None => {
                let path = self.object_path(bucket, key).ok()?;
                let absolute = fs::canonicalize(path).await.ok()?;
                Some(format!("file://{}", absolute.display()))
            }
        }
    }
}

/// Media type implied by a file name's extension.
pub fn guess_content_type(key: &str) -> &'static str {
    let extension = Path::new(key)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "xml" => "application/xml",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        _ => "binary/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn engine(dir: &tempfile::TempDir, base: Option<&str>) -> LocalStorageEngine {
        LocalStorageEngine::new(StorageConfig {
            data_dir: dir.path().join("data"),
            temp_dir: dir.path().join("tmp"),
            public_base_url: base.map(str::to_string),
        })
        .unwrap()
    }

    fn request(key: &str, data: &'static [u8]) -> PutObjectRequest {
        PutObjectRequest {
            bucket: "pdfs".to_string(),
            key: key.to_string(),
            content_type: "application/pdf".to_string(),
            cache_control_secs: DEFAULT_CACHE_CONTROL_SECS,
            data: Bytes::from_static(data),
        }
    }

    #[tokio::test]
    async fn put_reports_size_and_etag() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(&dir, None);

        assert!(!engine.contains("pdfs", "1-a.pdf").await.unwrap());

        let stored = engine.put_object(request("1-a.pdf", b"%PDF-1.4")).await.unwrap();
        assert_eq!(stored.size, 8);
        assert_eq!(stored.etag.as_deref().map(str::len), Some(32));

        assert!(engine.contains("pdfs", "1-a.pdf").await.unwrap());
        let contents = std::fs::read(dir.path().join("data/pdfs/1-a.pdf")).unwrap();
        assert_eq!(contents, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn refuses_to_overwrite_existing_object() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(&dir, None);

        engine.put_object(request("1-a.pdf", b"first")).await.unwrap();
        let err = engine.put_object(request("1-a.pdf", b"second")).await.unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(ref key) if key == "1-a.pdf"));

        let contents = std::fs::read(dir.path().join("data/pdfs/1-a.pdf")).unwrap();
        assert_eq!(contents, b"first");
        assert_eq!(std::fs::read_dir(dir.path().join("tmp")).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn rejects_traversal_keys() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(&dir, None);

        let err = engine.put_object(request("../escape.pdf", b"x")).await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }

    #[tokio::test]
    async fn public_url_uses_base_and_requires_object() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(&dir, Some("https://files.example.com/"));

        assert_eq!(engine.public_url("pdfs", "1-a.pdf").await, None);

        engine.put_object(request("1-a.pdf", b"x")).await.unwrap();
        assert_eq!(
            engine.public_url("pdfs", "1-a.pdf").await.as_deref(),
            Some("https://files.example.com/pdfs/1-a.pdf")
        );
    }

    #[tokio::test]
    async fn public_url_falls_back_to_file_scheme() {
        let dir = tempfile::tempdir().unwrap();
        let engine = engine(&dir, None);

        engine.put_object(request("1-a.pdf", b"x")).await.unwrap();
        let url = engine.public_url("pdfs", "1-a.pdf").await.unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("pdfs/1-a.pdf"));
    }

    #[test]
    fn guesses_pdf_case_insensitively() {
        assert_eq!(guess_content_type("Report.PDF"), "application/pdf");
        assert_eq!(guess_content_type("notes.txt"), "text/plain");
        assert_eq!(guess_content_type("README"), "binary/octet-stream");
    }
}
