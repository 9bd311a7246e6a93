/// Replaces every character outside `[A-Za-z0-9.-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Object key for an upload started at `timestamp_ms`. Two uploads of the
/// same name within one millisecond collide; the store's no-overwrite rule
/// turns the second into an error.
pub fn storage_path(timestamp_ms: i64, original_name: &str) -> String {
    format!("{}-{}", timestamp_ms, sanitize_file_name(original_name))
}
