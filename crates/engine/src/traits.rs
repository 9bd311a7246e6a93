use bytes::Bytes;
use thiserror::Error;

/// Cache lifetime attached to uploaded objects, in seconds.
pub const DEFAULT_CACHE_CONTROL_SECS: u32 = 3600;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("The resource already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Backend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Debug, Clone)]
pub struct PutObjectRequest {
    pub bucket: String,
    pub key: String,
    pub content_type: String,
    pub cache_control_secs: u32,
    pub data: Bytes,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub size: u64,
    pub etag: Option<String>,
}

#[allow(async_fn_in_trait)]
pub trait StorageEngine: Send + Sync {
    /// Stores a new object. An existing object at the same key is never
    /// replaced: the call fails with [`StorageError::AlreadyExists`].
    async fn put_object(&self, request: PutObjectRequest) -> StorageResult<StoredObject>;

    /// Publicly reachable URL for a stored object, `None` when none can be produced.
    async fn public_url(&self, bucket: &str, key: &str) -> Option<String>;
}
