use crate::{
    machine::{Phase, Session},
    selection::format_file_size,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    DropZone,
    FileInfo,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    pub name: String,
    pub size_label: String,
}

/// What a renderer shows for a session. Exactly one panel is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub panel: Panel,
    pub file: Option<FileSummary>,
    pub custom_name: String,
    pub year: Option<String>,
    pub doc_type: Option<String>,
    pub year_options: Vec<String>,
    pub type_options: Vec<String>,
    pub submit_enabled: bool,
    pub link: Option<String>,
    pub error_message: Option<String>,
    pub copy_confirmed: bool,
    pub save_acknowledged: bool,
}

impl View {
    pub fn of(session: &Session) -> Self {
        let panel = match session.phase() {
            Phase::Idle => Panel::DropZone,
            Phase::FileSelected => Panel::FileInfo,
            Phase::Loading => Panel::Loading,
            Phase::Success => Panel::Success,
            Phase::Error => Panel::Error,
        };

        let form = session.form();

        Self {
            panel,
            file: session.selected().map(|file| FileSummary {
                name: file.name().to_string(),
                size_label: format_file_size(file.size()),
            }),
            custom_name: form.custom_name.clone(),
            year: form.year.clone(),
            doc_type: form.doc_type.clone(),
            year_options: session.options().years.clone(),
            type_options: session.options().types.clone(),
            submit_enabled: session.submit_enabled(),
            link: match panel {
                Panel::Success => session.public_url().map(str::to_string),
                _ => None,
            },
            error_message: match panel {
                Panel::Error => session.error().map(|e| e.to_string()),
                _ => None,
            },
            copy_confirmed: session.copy_confirmed(),
            save_acknowledged: session.save_acknowledged(),
        }
    }
}
