use pdfdrop_engine::DEFAULT_CACHE_CONTROL_SECS;
use pdfdrop_remote::{ANON_KEY_ENV, URL_ENV};
use pdfdrop_workflow::{FormOptions, OptionsError, UploadSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid form options: {0}")]
    Options(#[from] OptionsError),

    #[error("Remote backend needs {0} (set it in the config file or the {1} environment variable)")]
    MissingRemote(&'static str, &'static str),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub bucket: String,
    pub table: String,
    pub cache_control_secs: u32,
    pub backend: BackendConfig,
    pub form: FormOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            bucket: "pdfs".to_string(),
            table: "pdf_files".to_string(),
            cache_control_secs: DEFAULT_CACHE_CONTROL_SECS,
            backend: BackendConfig::Local(LocalBackend::default()),
            form: FormOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    Local(LocalBackend),
    Remote(RemoteBackend),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalBackend {
    pub data_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub database_url: String,
    pub public_base_url: Option<String>,
}

impl Default for LocalBackend {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            temp_dir: PathBuf::from("./tmp"),
            database_url: "sqlite:./pdfdrop.db".to_string(),
            public_base_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteBackend {
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

impl RemoteBackend {
    /// Config values win; missing ones come from the environment.
    pub fn resolve(&self) -> Result<(String, String), ConfigError> {
        let url = self
            .url
            .clone()
            .or_else(|| std::env::var(URL_ENV).ok())
            .ok_or(ConfigError::MissingRemote("a url", URL_ENV))?;
        let anon_key = self
            .anon_key
            .clone()
            .or_else(|| std::env::var(ANON_KEY_ENV).ok())
            .ok_or(ConfigError::MissingRemote("an anon_key", ANON_KEY_ENV))?;
        Ok((url, anon_key))
    }
}

impl AppConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.form.validate()?;
        Ok(config)
    }

    pub async fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_toml(&content)
    }

    pub fn upload_settings(&self) -> UploadSettings {
        UploadSettings {
            bucket: self.bucket.clone(),
            cache_control_secs: self.cache_control_secs,
        }
    }
}
