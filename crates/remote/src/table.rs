use anyhow::{anyhow, Context, Result};
use pdfdrop_catalog::{MetadataStore, NewPdfFile, PdfFile, PdfFileFilter};
use reqwest::{header, Method};

use crate::{error_message, BackendClient};

const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// A table behind the hosted `/rest/v1` API.
#[derive(Clone, Debug)]
pub struct RestTable {
    client: BackendClient,
    table: String,
}

impl RestTable {
    pub fn new(client: BackendClient, table: &str) -> Self {
        Self {
            client,
            table: table.to_string(),
        }
    }

    fn path(&self) -> String {
        format!("/rest/v1/{}", self.table)
    }
}

impl MetadataStore for RestTable {
    async fn insert(&self, record: NewPdfFile) -> Result<PdfFile> {
        let response = self
            .client
            .request(Method::POST, &self.path())
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, SINGLE_OBJECT)
            .json(&record)
            .send()
            .await
            .context("Failed to send insert request")?;

        if !response.status().is_success() {
            let message = error_message(response).await;
            tracing::error!("Insert into {} rejected: {}", self.table, message);
            return Err(anyhow!(message));
        }

        response
            .json::<PdfFile>()
            .await
            .context("Failed to parse inserted row")
    }

    async fn list(&self, filter: &PdfFileFilter) -> Result<Vec<PdfFile>> {
        let limit = filter.limit.unwrap_or(100).clamp(1, 1000);

        let mut query: Vec<(&str, String)> = vec![
            ("select", "*".to_string()),
            ("order", "created_at.desc".to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(year) = filter.year {
            query.push(("year", format!("eq.{}", year)));
        }
        if let Some(doc_type) = &filter.doc_type {
            query.push(("type", format!("eq.{}", doc_type)));
        }

        let response = self
            .client
            .request(Method::GET, &self.path())
            .query(&query)
            .send()
            .await
            .context("Failed to send list request")?;

        if !response.status().is_success() {
            return Err(anyhow!(error_message(response).await));
        }

        response
            .json::<Vec<PdfFile>>()
            .await
            .context("Failed to parse table rows")
    }
}
