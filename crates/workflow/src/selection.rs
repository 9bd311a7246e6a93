use bytes::Bytes;

use crate::error::{WorkflowError, WorkflowResult};

pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// 50 MiB.
pub const MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// A file offered by the user, before any checks.
#[derive(Debug, Clone, PartialEq)]
pub struct FileCandidate {
    pub name: String,
    pub media_type: String,
    pub size: u64,
    pub contents: Bytes,
}

/// A candidate that passed the type and size checks.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile(FileCandidate);

impl SelectedFile {
    pub fn try_from_candidate(candidate: FileCandidate) -> WorkflowResult<Self> {
        if candidate.media_type != PDF_MEDIA_TYPE {
            return Err(WorkflowError::NotPdf);
        }
        if candidate.size > MAX_FILE_SIZE {
            return Err(WorkflowError::TooLarge);
        }
        Ok(Self(candidate))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn media_type(&self) -> &str {
        &self.0.media_type
    }

    pub fn size(&self) -> u64 {
        self.0.size
    }

    pub fn contents(&self) -> &Bytes {
        &self.0.contents
    }
}

/// File name with a trailing `.pdf` removed, ignoring case.
pub fn strip_pdf_extension(name: &str) -> &str {
    const SUFFIX: &str = ".pdf";
    let split = name.len().wrapping_sub(SUFFIX.len());

    match name.get(split..) {
        Some(tail) if tail.eq_ignore_ascii_case(SUFFIX) => &name[..split],
        _ => name,
    }
}

/// Binary-unit size label rounded to two decimals, trailing zeros dropped.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exponent = 0;
    while exponent < UNITS.len() - 1 && bytes >= 1024u64.pow(exponent as u32 + 1) {
        exponent += 1;
    }

    // Ties at the second decimal round up.
    let value = bytes as f64 / 1024f64.powi(exponent as i32);
    let rounded = format!("{:.2}", (value * 100.0).round() / 100.0);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');

    format!("{} {}", trimmed, UNITS[exponent])
}
