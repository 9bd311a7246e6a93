//! Upload workflow state machine.
//!
//! [`transition`] is pure: it takes the current [`Session`] and an [`Event`]
//! and returns the next session plus the [`Effect`]s the host must carry
//! out. Effects report back by feeding new events in.

use pdfdrop_catalog::RecordId;
use std::time::Duration;

use crate::{
    error::{WorkflowError, WorkflowResult},
    form::{FormOptions, UploadForm},
    path::storage_path,
    pipeline::{UploadOutcome, UploadRequest},
    selection::{strip_pdf_extension, FileCandidate, SelectedFile},
};

/// How long copy and save confirmations stay visible.
pub const CONFIRMATION_WINDOW: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    FileSelected,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    CopyConfirmation,
    SaveAcknowledgement,
}

#[derive(Debug, Clone)]
pub enum Event {
    FileChosen(FileCandidate),
    FileRemoved,
    NameEdited(String),
    YearSelected(Option<String>),
    TypeSelected(Option<String>),
    Submit { timestamp_ms: i64 },
    UploadFinished {
        attempt: u64,
        result: WorkflowResult<UploadOutcome>,
    },
    Reset,
    CopyLink,
    CopySucceeded,
    CopyFailed,
    SaveLink,
    TimerElapsed(Timer),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Run the remote pipeline, then feed back `UploadFinished` with `attempt`.
    Upload { attempt: u64, request: UploadRequest },
    /// Copy `url`, then feed back `CopySucceeded` or `CopyFailed`.
    CopyToClipboard { url: String },
    /// Feed back `TimerElapsed(timer)` once `after` has passed.
    Schedule { after: Duration, timer: Timer },
}

/// Working memory of one upload form, from page load until reset.
#[derive(Debug, Clone, Default)]
pub struct Session {
    options: FormOptions,
    phase: Phase,
    selected: Option<SelectedFile>,
    form: UploadForm,
    attempt: u64,
    public_url: Option<String>,
    current_upload_id: Option<RecordId>,
    error: Option<WorkflowError>,
    copy_confirmed: bool,
    save_acknowledged: bool,
}

impl Session {
    pub fn new(options: FormOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn form(&self) -> &UploadForm {
        &self.form
    }

    pub fn public_url(&self) -> Option<&str> {
        self.public_url.as_deref()
    }

    pub fn current_upload_id(&self) -> Option<&RecordId> {
        self.current_upload_id.as_ref()
    }

    pub fn error(&self) -> Option<&WorkflowError> {
        self.error.as_ref()
    }

    pub fn copy_confirmed(&self) -> bool {
        self.copy_confirmed
    }

    pub fn save_acknowledged(&self) -> bool {
        self.save_acknowledged
    }

    pub fn submit_enabled(&self) -> bool {
        self.selected.is_some() && self.phase != Phase::Loading
    }

    fn fail(&mut self, error: WorkflowError) {
        self.phase = Phase::Error;
        self.error = Some(error);
        self.copy_confirmed = false;
        self.save_acknowledged = false;
    }

    fn clear_status(&mut self) {
        self.error = None;
        self.public_url = None;
        self.copy_confirmed = false;
        self.save_acknowledged = false;
    }

    fn prepare_upload(&self, timestamp_ms: i64) -> WorkflowResult<UploadRequest> {
        let file = self.selected.as_ref().ok_or(WorkflowError::NoFileSelected)?;
        let form = self.form.validate()?;

        Ok(UploadRequest {
            path: storage_path(timestamp_ms, file.name()),
            original_name: file.name().to_string(),
            custom_name: form.custom_name,
            year: form.year,
            doc_type: form.doc_type,
            size: file.size(),
            content_type: file.media_type().to_string(),
            contents: file.contents().clone(),
        })
    }

    fn link_available(&self) -> bool {
        self.phase == Phase::Success && self.public_url.is_some()
    }
}

pub fn transition(mut session: Session, event: Event) -> (Session, Vec<Effect>) {
    let loading = session.phase == Phase::Loading;
    let mut effects = Vec::new();

    match event {
        // Selection and form inputs are locked while an upload is in flight.
        Event::FileChosen(_)
        | Event::FileRemoved
        | Event::NameEdited(_)
        | Event::YearSelected(_)
        | Event::TypeSelected(_)
        | Event::Submit { .. }
            if loading => {}

        Event::FileChosen(candidate) => match SelectedFile::try_from_candidate(candidate) {
            Ok(file) => {
                session.form.custom_name = strip_pdf_extension(file.name()).to_string();
                session.selected = Some(file);
                session.clear_status();
                session.phase = Phase::FileSelected;
            }
            Err(error) => session.fail(error),
        },

        Event::FileRemoved => {
            session.selected = None;
            session.form = UploadForm::default();
            session.clear_status();
            session.phase = Phase::Idle;
        }

        Event::NameEdited(name) => session.form.custom_name = name,

        Event::YearSelected(value) => {
            session.form.year = session.options.pick_year(value.as_deref());
        }

        Event::TypeSelected(value) => {
            session.form.doc_type = session.options.pick_type(value.as_deref());
        }

        Event::Submit { timestamp_ms } => match session.prepare_upload(timestamp_ms) {
            Ok(request) => {
                session.attempt += 1;
                session.clear_status();
                session.phase = Phase::Loading;
                effects.push(Effect::Upload {
                    attempt: session.attempt,
                    request,
                });
            }
            Err(error) => session.fail(error),
        },

        Event::UploadFinished { attempt, result } => {
            // Results for a reset or superseded attempt are dropped.
            if loading && attempt == session.attempt {
                match result {
                    Ok(outcome) => {
                        session.public_url = Some(outcome.public_url);
                        session.current_upload_id = Some(outcome.record.id);
                        session.phase = Phase::Success;
                    }
                    Err(error) => session.fail(error),
                }
            }
        }

        Event::Reset => {
            let attempt = session.attempt;
            session = Session {
                attempt,
                ..Session::new(session.options)
            };
        }

        Event::CopyLink => match session.public_url.clone().filter(|_| session.link_available()) {
            Some(url) => effects.push(Effect::CopyToClipboard { url }),
            None => session.fail(WorkflowError::NoLinkAvailable),
        },

        Event::CopySucceeded => {
            if session.phase == Phase::Success {
                session.copy_confirmed = true;
                effects.push(Effect::Schedule {
                    after: CONFIRMATION_WINDOW,
                    timer: Timer::CopyConfirmation,
                });
            }
        }

        Event::CopyFailed => session.fail(WorkflowError::Clipboard),

        Event::SaveLink => {
            if !session.link_available() {
                session.fail(WorkflowError::NoLinkAvailable);
            } else if !session.save_acknowledged {
                session.save_acknowledged = true;
                effects.push(Effect::Schedule {
                    after: CONFIRMATION_WINDOW,
                    timer: Timer::SaveAcknowledgement,
                });
            }
        }

        Event::TimerElapsed(Timer::CopyConfirmation) => session.copy_confirmed = false,
        Event::TimerElapsed(Timer::SaveAcknowledgement) => session.save_acknowledged = false,
    }

    (session, effects)
}
