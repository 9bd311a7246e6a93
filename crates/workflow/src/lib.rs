//! PDF upload workflow: file selection, form validation, the two-step
//! remote upload and the presentation states around it.

pub mod clipboard;
pub mod controller;
pub mod error;
pub mod form;
pub mod machine;
pub mod path;
pub mod pipeline;
pub mod selection;
pub mod view;

#[cfg(test)]
mod testing;

pub use clipboard::Clipboard;
pub use controller::{Renderer, Scheduled, UploadController};
pub use error::{WorkflowError, WorkflowResult};
pub use form::{FormOptions, OptionsError, UploadForm};
pub use machine::{transition, Effect, Event, Phase, Session, Timer};
pub use pipeline::{UploadOutcome, UploadRequest, UploadSettings};
pub use selection::{format_file_size, FileCandidate, SelectedFile, MAX_FILE_SIZE, PDF_MEDIA_TYPE};
pub use view::{FileSummary, Panel, View};
