use pdfdrop_catalog::MetadataStore;
use pdfdrop_engine::StorageEngine;
use std::{collections::VecDeque, time::Duration};

use crate::{
    clipboard::{copy_with_fallback, Clipboard},
    form::FormOptions,
    machine::{transition, Effect, Event, Phase, Session, Timer},
    pipeline::{self, UploadSettings},
    selection::FileCandidate,
    view::View,
};

/// Receives a fresh [`View`] after every state change.
pub trait Renderer {
    fn render(&mut self, view: &View);
}

/// A timer the host must fire later through [`UploadController::on_timer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scheduled {
    pub after: Duration,
    pub timer: Timer,
}

/// Owns one upload session and the collaborators its effects need.
///
/// Every `on_*` handler feeds one event through the state machine, runs the
/// resulting effects to completion (an upload is awaited in place, so a
/// second submit can only arrive once it has finished), and hands back the
/// timers the host has to schedule.
pub struct UploadController<S, M, C, R> {
    storage: S,
    catalog: M,
    clipboard: C,
    renderer: R,
    settings: UploadSettings,
    session: Session,
}

impl<S, M, C, R> UploadController<S, M, C, R>
where
    S: StorageEngine,
    M: MetadataStore,
    C: Clipboard,
    R: Renderer,
{
    pub fn new(
        storage: S,
        catalog: M,
        clipboard: C,
        mut renderer: R,
        settings: UploadSettings,
        options: FormOptions,
    ) -> Self {
        let session = Session::new(options);
        renderer.render(&View::of(&session));

        Self {
            storage,
            catalog,
            clipboard,
            renderer,
            settings,
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn view(&self) -> View {
        View::of(&self.session)
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn catalog(&self) -> &M {
        &self.catalog
    }

    pub async fn dispatch(&mut self, event: Event) -> Vec<Scheduled> {
        let mut pending = VecDeque::from([event]);
        let mut scheduled = Vec::new();

        while let Some(event) = pending.pop_front() {
            let before = self.session.phase();
            let (next, effects) = transition(std::mem::take(&mut self.session), event);
            self.session = next;

            if before != self.session.phase() {
                tracing::debug!(from = ?before, to = ?self.session.phase(), "Phase changed");
                match self.session.error() {
                    Some(e) if e.is_validation() => tracing::debug!("Rejected input: {}", e),
                    Some(e) => tracing::warn!("Workflow failed: {}", e),
                    None => {}
                }
            }
            self.renderer.render(&View::of(&self.session));

            for effect in effects {
                match effect {
                    Effect::Upload { attempt, request } => {
                        let result =
                            pipeline::run(&self.storage, &self.catalog, &self.settings, &request)
                                .await;
                        pending.push_back(Event::UploadFinished { attempt, result });
                    }
                    Effect::CopyToClipboard { url } => {
                        let copied = copy_with_fallback(&mut self.clipboard, &url).await;
                        pending.push_back(match copied {
                            Ok(()) => Event::CopySucceeded,
                            Err(_) => Event::CopyFailed,
                        });
                    }
                    Effect::Schedule { after, timer } => {
                        scheduled.push(Scheduled { after, timer });
                    }
                }
            }
        }

        scheduled
    }

    pub async fn on_file_chosen(&mut self, candidate: FileCandidate) -> Vec<Scheduled> {
        self.dispatch(Event::FileChosen(candidate)).await
    }

    pub async fn on_remove(&mut self) -> Vec<Scheduled> {
        self.dispatch(Event::FileRemoved).await
    }

    pub async fn on_name_edited(&mut self, name: impl Into<String>) -> Vec<Scheduled> {
        self.dispatch(Event::NameEdited(name.into())).await
    }

    pub async fn on_year_selected(&mut self, year: Option<String>) -> Vec<Scheduled> {
        self.dispatch(Event::YearSelected(year)).await
    }

    pub async fn on_type_selected(&mut self, doc_type: Option<String>) -> Vec<Scheduled> {
        self.dispatch(Event::TypeSelected(doc_type)).await
    }

    /// Submits with the current wall-clock time as the path prefix.
    pub async fn on_submit(&mut self) -> Vec<Scheduled> {
        let timestamp_ms = chrono::Utc::now().timestamp_millis();
        self.dispatch(Event::Submit { timestamp_ms }).await
    }

    pub async fn on_reset(&mut self) -> Vec<Scheduled> {
        self.dispatch(Event::Reset).await
    }

    pub async fn on_copy_link(&mut self) -> Vec<Scheduled> {
        self.dispatch(Event::CopyLink).await
    }

    pub async fn on_save_link(&mut self) -> Vec<Scheduled> {
        self.dispatch(Event::SaveLink).await
    }

    pub async fn on_timer(&mut self, timer: Timer) -> Vec<Scheduled> {
        self.dispatch(Event::TimerElapsed(timer)).await
    }
}
