use pdfdrop_workflow::{Panel, Renderer, View};
use std::io::Write;

/// Lines shown for a view: the active panel, then the form when a file is
/// selected.
pub fn describe(view: &View) -> Vec<String> {
    let mut lines = Vec::new();

    match view.panel {
        Panel::DropZone => {
            lines.push("Drop a PDF here or choose one (PDF only, max 50MB)".to_string());
        }
        Panel::FileInfo => {}
        Panel::Loading => lines.push("Uploading...".to_string()),
        Panel::Success => {
            lines.push("Upload complete!".to_string());
            if let Some(link) = &view.link {
                let copied = if view.copy_confirmed { "  [copied]" } else { "" };
                lines.push(format!("Link: {}{}", link, copied));
            }
            if view.save_acknowledged {
                lines.push("Link already saved!".to_string());
            }
        }
        Panel::Error => {
            if let Some(message) = &view.error_message {
                lines.push(format!("Error: {}", message));
            }
        }
    }

    if let Some(file) = &view.file {
        lines.push(format!("File: {} ({})", file.name, file.size_label));
        lines.push(format!("  Name: {}", view.custom_name));
        lines.push(format!(
            "  Grade/series: {}  [{}]",
            view.year.as_deref().unwrap_or("-"),
            view.year_options.join(", ")
        ));
        lines.push(format!(
            "  Type: {}  [{}]",
            view.doc_type.as_deref().unwrap_or("-"),
            view.type_options.join(", ")
        ));
        if view.submit_enabled {
            lines.push("  Ready to upload".to_string());
        }
    }

    lines
}

/// Prints each view that differs from the last one printed.
pub struct TerminalRenderer<W: Write> {
    out: W,
    last: Option<View>,
}

impl TerminalRenderer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn render(&mut self, view: &View) {
        if self.last.as_ref() == Some(view) {
            return;
        }

        let mut block = describe(view).join("\n");
        block.push('\n');
        if let Err(e) = self.out.write_all(block.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to render view: {}", e);
        }
        self.last = Some(view.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdfdrop_workflow::{FileSummary, FormOptions, Session};

    fn success_view() -> View {
        View {
            panel: Panel::Success,
            file: Some(FileSummary {
                name: "Report.pdf".to_string(),
                size_label: "1.5 KB".to_string(),
            }),
            custom_name: "Report".to_string(),
            year: Some("2".to_string()),
            doc_type: Some("exam".to_string()),
            year_options: vec!["1".to_string(), "2".to_string()],
            type_options: vec!["exam".to_string()],
            submit_enabled: true,
            link: Some("https://cdn.test/pdfs/1-Report.pdf".to_string()),
            error_message: None,
            copy_confirmed: true,
            save_acknowledged: false,
        }
    }

    #[test]
    fn success_lists_link_and_form() {
        let lines = describe(&success_view());
        assert_eq!(lines[0], "Upload complete!");
        assert_eq!(lines[1], "Link: https://cdn.test/pdfs/1-Report.pdf  [copied]");
        assert!(lines.contains(&"File: Report.pdf (1.5 KB)".to_string()));
        assert!(lines.contains(&"  Grade/series: 2  [1, 2]".to_string()));
    }

    #[test]
    fn idle_shows_drop_zone_only() {
        let lines = describe(&View::of(&Session::new(FormOptions::default())));
        assert_eq!(lines, ["Drop a PDF here or choose one (PDF only, max 50MB)"]);
    }

    #[test]
    fn unchanged_views_are_printed_once() {
        let mut renderer = TerminalRenderer::new(Vec::new());
        renderer.render(&success_view());
        renderer.render(&success_view());

        let printed = String::from_utf8(renderer.into_inner()).unwrap();
        assert_eq!(printed.matches("Upload complete!").count(), 1);
    }
}
