use std::path::PathBuf;

pub mod local;
pub mod traits;

pub use local::*;
pub use traits::*;

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub temp_dir: PathBuf,
    /// Prefix for public links; objects resolve to `file://` URLs when unset.
    pub public_base_url: Option<String>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            temp_dir: PathBuf::from("./tmp"),
            public_base_url: None,
        }
    }
}

pub fn create_storage_engine(config: StorageConfig) -> StorageResult<LocalStorageEngine> {
    LocalStorageEngine::new(config)
}
