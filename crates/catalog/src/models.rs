use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned identifier; hosted tables hand out integers, the local
/// catalog hands out UUID strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(id) => write!(f, "{}", id),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfFile {
    pub id: RecordId,
    /// Storage path of the uploaded object.
    pub filename: String,
    pub original_name: String,
    pub name: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub file_size: i64,
    pub file_url: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPdfFile {
    pub filename: String,
    pub original_name: String,
    pub name: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub file_size: i64,
    pub file_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct PdfFileFilter {
    pub year: Option<i32>,
    pub doc_type: Option<String>,
    pub limit: Option<i32>,
}
