use anyhow::Result;

use crate::error::{WorkflowError, WorkflowResult};

/// A place the public link can be copied to.
#[allow(async_fn_in_trait)]
pub trait Clipboard {
    /// Immediate copy; tried first.
    fn copy_selection(&mut self, text: &str) -> Result<()>;

    /// Slower write used when the immediate copy fails.
    async fn write_text(&mut self, text: &str) -> Result<()>;
}

/// Copies `text` with the immediate strategy, falling back to the async
/// write. Fails only when both do.
pub async fn copy_with_fallback<C: Clipboard>(clipboard: &mut C, text: &str) -> WorkflowResult<()> {
    let primary = match clipboard.copy_selection(text) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };
    tracing::warn!("Selection copy failed, trying clipboard write: {}", primary);

    clipboard.write_text(text).await.map_err(|e| {
        tracing::error!("Clipboard write failed: {}", e);
        WorkflowError::Clipboard
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeClipboard;

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let mut clipboard = FakeClipboard {
            fallback_fails: true,
            ..FakeClipboard::default()
        };
        copy_with_fallback(&mut clipboard, "https://x").await.unwrap();
        assert_eq!(clipboard.copied, ["https://x"]);
    }

    #[tokio::test]
    async fn falls_back_when_primary_fails() {
        let mut clipboard = FakeClipboard {
            primary_fails: true,
            ..FakeClipboard::default()
        };
        copy_with_fallback(&mut clipboard, "https://x").await.unwrap();
        assert_eq!(clipboard.copied, ["https://x"]);
    }

    #[tokio::test]
    async fn fails_when_both_strategies_fail() {
        let mut clipboard = FakeClipboard {
            primary_fails: true,
            fallback_fails: true,
            copied: Vec::new(),
        };
        let err = copy_with_fallback(&mut clipboard, "https://x").await.unwrap_err();
        assert_eq!(err, WorkflowError::Clipboard);
    }
}
