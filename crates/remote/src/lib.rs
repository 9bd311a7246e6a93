//! HTTP client for the hosted backend that holds uploaded PDFs.
//!
//! The backend exposes an object-storage API under `/storage/v1` and a
//! REST table API under `/rest/v1`. Both authenticate with the project's
//! anonymous key, sent as `apikey` and as a bearer token.

pub mod storage;
pub mod table;

pub use storage::RemoteStorage;
pub use table::RestTable;

use anyhow::{Context, Result};
use reqwest::{Client, Method, RequestBuilder, Response};
use std::time::Duration;

/// Environment variables holding the project URL and anonymous key.
pub const URL_ENV: &str = "SUPABASE_URL";
pub const ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";

#[derive(Clone, Debug)]
pub struct BackendClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl BackendClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.build_url(path))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }
}

/// Human-readable reason from an error response: the JSON `message` (or
/// `error`) field when present, otherwise the raw body.
pub(crate) async fn error_message(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let from_json = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .or_else(|| value.get("error"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        });

    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => format!("request failed with status {}", status),
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let client = BackendClient::new("https://project.example.co/", "key").unwrap();
        assert_eq!(client.base_url(), "https://project.example.co");
        assert_eq!(
            client.build_url("/rest/v1/pdf_files"),
            "https://project.example.co/rest/v1/pdf_files"
        );
    }
}
