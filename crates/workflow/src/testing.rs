//! In-memory collaborators that record every call.

use anyhow::{anyhow, Result};
use pdfdrop_catalog::{MetadataStore, NewPdfFile, PdfFile, PdfFileFilter, RecordId};
use pdfdrop_engine::{PutObjectRequest, StorageEngine, StorageError, StorageResult, StoredObject};
use std::sync::Mutex;

use crate::{clipboard::Clipboard, controller::Renderer, view::View};

pub struct FakeStorage {
    puts: Mutex<Vec<PutObjectRequest>>,
    failure: Option<String>,
    urls: bool,
}

impl Default for FakeStorage {
    fn default() -> Self {
        Self {
            puts: Mutex::new(Vec::new()),
            failure: None,
            urls: true,
        }
    }
}

impl FakeStorage {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn without_urls() -> Self {
        Self {
            urls: false,
            ..Self::default()
        }
    }

    pub fn puts(&self) -> Vec<PutObjectRequest> {
        self.puts.lock().unwrap().clone()
    }
}

impl StorageEngine for FakeStorage {
    async fn put_object(&self, request: PutObjectRequest) -> StorageResult<StoredObject> {
        self.puts.lock().unwrap().push(request.clone());
        if let Some(message) = &self.failure {
            return Err(StorageError::Backend(message.clone()));
        }
        Ok(StoredObject {
            bucket: request.bucket,
            key: request.key,
            size: request.data.len() as u64,
            etag: None,
        })
    }

    async fn public_url(&self, bucket: &str, key: &str) -> Option<String> {
        self.urls.then(|| format!("https://cdn.test/{}/{}", bucket, key))
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    inserts: Mutex<Vec<NewPdfFile>>,
    failure: Option<String>,
}

impl FakeCatalog {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn inserts(&self) -> Vec<NewPdfFile> {
        self.inserts.lock().unwrap().clone()
    }
}

impl MetadataStore for FakeCatalog {
    async fn insert(&self, record: NewPdfFile) -> Result<PdfFile> {
        let mut inserts = self.inserts.lock().unwrap();
        inserts.push(record.clone());
        if let Some(message) = &self.failure {
            return Err(anyhow!(message.clone()));
        }
        Ok(PdfFile {
            id: RecordId::Int(inserts.len() as i64),
            filename: record.filename,
            original_name: record.original_name,
            name: record.name,
            year: record.year,
            doc_type: record.doc_type,
            file_size: record.file_size,
            file_url: record.file_url,
            created_at: None,
        })
    }

    async fn list(&self, _filter: &PdfFileFilter) -> Result<Vec<PdfFile>> {
        Ok(Vec::new())
    }
}

/// Clipboard whose two strategies succeed or fail on demand.
#[derive(Default)]
pub struct FakeClipboard {
    pub primary_fails: bool,
    pub fallback_fails: bool,
    pub copied: Vec<String>,
}

impl Clipboard for FakeClipboard {
    fn copy_selection(&mut self, text: &str) -> Result<()> {
        if self.primary_fails {
            return Err(anyhow!("selection copy unsupported"));
        }
        self.copied.push(text.to_string());
        Ok(())
    }

    async fn write_text(&mut self, text: &str) -> Result<()> {
        if self.fallback_fails {
            return Err(anyhow!("clipboard write denied"));
        }
        self.copied.push(text.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub views: Vec<View>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, view: &View) {
        self.views.push(view.clone());
    }
}
