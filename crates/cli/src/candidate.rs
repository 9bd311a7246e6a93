use anyhow::{Context, Result};
use bytes::Bytes;
use pdfdrop_engine::guess_content_type;
use pdfdrop_workflow::{FileCandidate, MAX_FILE_SIZE};
use std::path::Path;
use tokio::fs;

/// Builds a candidate from a local file. The declared media type comes from
/// `content_type` when given, otherwise from the extension.
pub async fn read_candidate(path: &Path, content_type: Option<&str>) -> Result<FileCandidate> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("Invalid file name: {}", path.display()))?
        .to_string();

    let metadata = fs::metadata(path)
        .await
        .with_context(|| format!("Failed to open file: {}", path.display()))?;

    // Oversized files are rejected on their size alone.
    let contents = if metadata.len() <= MAX_FILE_SIZE {
        Some(Bytes::from(
            fs::read(path)
                .await
                .with_context(|| format!("Failed to read file: {}", path.display()))?,
        ))
    } else {
        None
    };

    let media_type = content_type
        .map(str::to_string)
        .unwrap_or_else(|| guess_content_type(&name).to_string());

    Ok(assemble(name, media_type, metadata.len(), contents))
}

/// The size of bytes actually read wins over the size reported before the
/// read; `listed_size` only stands in when the contents were skipped.
fn assemble(name: String, media_type: String, listed_size: u64, contents: Option<Bytes>) -> FileCandidate {
    match contents {
        Some(contents) => FileCandidate {
            name,
            media_type,
            size: contents.len() as u64,
            contents,
        },
        None => FileCandidate {
            name,
            media_type,
            size: listed_size,
            contents: Bytes::new(),
        },
    }
}
