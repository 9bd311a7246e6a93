use anyhow::Result;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

pub mod migrations;
pub mod models;
pub mod repository;

pub use models::*;
pub use repository::*;

/// Persists the metadata row that accompanies every stored PDF.
#[allow(async_fn_in_trait)]
pub trait MetadataStore: Send + Sync {
    async fn insert(&self, record: NewPdfFile) -> Result<PdfFile>;

    async fn list(&self, filter: &PdfFileFilter) -> Result<Vec<PdfFile>>;
}

#[derive(Debug, Clone)]
pub struct CatalogService {
    pool: SqlitePool,
}

impl CatalogService {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url).await?;
        Ok(Self { pool })
    }

    /// Single-connection pool over a private in-memory database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
