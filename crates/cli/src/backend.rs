use anyhow::Result;
use pdfdrop_catalog::{
    migrations, CatalogService, MetadataStore, NewPdfFile, PdfFile, PdfFileFilter,
    PdfFileRepository,
};
use pdfdrop_engine::{
    create_storage_engine, LocalStorageEngine, PutObjectRequest, StorageConfig, StorageEngine,
    StorageResult, StoredObject,
};
use pdfdrop_remote::{BackendClient, RemoteStorage, RestTable};

use crate::config::{AppConfig, BackendConfig};

pub enum Storage {
    Local(LocalStorageEngine),
    Remote(RemoteStorage),
}

pub enum Catalog {
    Local(PdfFileRepository),
    Remote(RestTable),
}

impl StorageEngine for Storage {
    async fn put_object(&self, request: PutObjectRequest) -> StorageResult<StoredObject> {
        match self {
            Storage::Local(engine) => engine.put_object(request).await,
            Storage::Remote(engine) => engine.put_object(request).await,
        }
    }

    async fn public_url(&self, bucket: &str, key: &str) -> Option<String> {
        match self {
            Storage::Local(engine) => engine.public_url(bucket, key).await,
            Storage::Remote(engine) => engine.public_url(bucket, key).await,
        }
    }
}

impl MetadataStore for Catalog {
    async fn insert(&self, record: NewPdfFile) -> Result<PdfFile> {
        match self {
            Catalog::Local(repo) => repo.insert(record).await,
            Catalog::Remote(table) => table.insert(record).await,
        }
    }

    async fn list(&self, filter: &PdfFileFilter) -> Result<Vec<PdfFile>> {
        match self {
            Catalog::Local(repo) => MetadataStore::list(repo, filter).await,
            Catalog::Remote(table) => table.list(filter).await,
        }
    }
}

pub async fn connect(config: &AppConfig) -> Result<(Storage, Catalog)> {
    match &config.backend {
        BackendConfig::Local(local) => {
            // Ensure database exists and is migrated
            migrations::ensure_database_exists(&local.database_url).await?;
            let catalog = CatalogService::new(&local.database_url).await?;
            migrations::run_migrations(catalog.pool()).await?;

            let engine = create_storage_engine(StorageConfig {
                data_dir: local.data_dir.clone(),
                temp_dir: local.temp_dir.clone(),
                public_base_url: local.public_base_url.clone(),
            })?;

            tracing::info!(data_dir = ?local.data_dir, "Using local backend");
            Ok((
                Storage::Local(engine),
                Catalog::Local(PdfFileRepository::new(catalog.pool().clone())),
            ))
        }
        BackendConfig::Remote(remote) => {
            let (url, anon_key) = remote.resolve()?;
            let client = BackendClient::new(&url, &anon_key)?;

            tracing::info!(url = %client.base_url(), "Using remote backend");
            Ok((
                Storage::Remote(RemoteStorage::new(client.clone())),
                Catalog::Remote(RestTable::new(client, &config.table)),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocalBackend;
    use bytes::Bytes;

    #[tokio::test]
    async fn local_backend_stores_and_lists() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            backend: BackendConfig::Local(LocalBackend {
                data_dir: dir.path().join("data"),
                temp_dir: dir.path().join("tmp"),
                database_url: format!("sqlite:{}", dir.path().join("pdfdrop.db").display()),
                public_base_url: Some("http://localhost:8080".to_string()),
            }),
            ..AppConfig::default()
        };

        let (storage, catalog) = connect(&config).await.unwrap();
        let stored = storage
            .put_object(PutObjectRequest {
                bucket: "pdfs".to_string(),
                key: "1-a.pdf".to_string(),
                content_type: "application/pdf".to_string(),
                cache_control_secs: 3600,
                data: Bytes::from_static(b"%PDF"),
            })
            .await
            .unwrap();
        let url = storage.public_url("pdfs", &stored.key).await.unwrap();
        assert_eq!(url, "http://localhost:8080/pdfs/1-a.pdf");

        catalog
            .insert(NewPdfFile {
                filename: stored.key,
                original_name: "a.pdf".to_string(),
                name: "a".to_string(),
                year: 1,
                doc_type: "exam".to_string(),
                file_size: 4,
                file_url: url,
            })
            .await
            .unwrap();

        let rows = catalog.list(&PdfFileFilter::default()).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "a");
    }
}
