use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use pdfdrop_workflow::Clipboard;
use std::io::IsTerminal;
use tokio::io::AsyncWriteExt;

/// System clipboard first, then the terminal's OSC 52 clipboard escape.
#[derive(Default)]
pub struct SystemClipboard {
    // Kept alive: on X11 the copied text disappears with its owner.
    clipboard: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

/// OSC 52 sequence that asks the terminal to place `text` on the clipboard.
pub fn osc52_sequence(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

impl Clipboard for SystemClipboard {
    fn copy_selection(&mut self, text: &str) -> Result<()> {
        if self.clipboard.is_none() {
            self.clipboard = Some(arboard::Clipboard::new()?);
        }
        let clipboard = self
            .clipboard
            .as_mut()
            .ok_or_else(|| anyhow!("clipboard unavailable"))?;
        clipboard.set_text(text)?;
        Ok(())
    }

    async fn write_text(&mut self, text: &str) -> Result<()> {
        if !std::io::stdout().is_terminal() {
            return Err(anyhow!("stdout is not a terminal"));
        }

        let mut stdout = tokio::io::stdout();
        stdout.write_all(osc52_sequence(text).as_bytes()).await?;
        stdout.flush().await?;
        Ok(())
    }
}
