//! The orchestration facade: the single owner of partition, visibility,
//! shell and remote-profile state.
//!
//! Section editors never see the containers. They receive a
//! [`SectionEditorHandle`] holding their own visibility flag and a close
//! callback, and every other observer subscribes to [`PortfolioEvent`]s.

use std::{
    collections::HashMap,
    sync::{Arc, Weak},
};

use serde::Serialize;
use shared::{
    domain::{Section, UserId, UserProfile, UserSectionEntry},
    protocol::ResolvedIdentity,
};
use tokio::sync::{broadcast, watch, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::{
    catalog::SectionCatalog,
    config::Settings,
    education::EducationEditor,
    error::{PortfolioError, Result},
    gateway::{CoverUpload, PortfolioApi},
    lifecycle::Liveness,
    loading::{LoadingOp, LoadingTracker},
    notice::{Notice, NoticeContext, Severity},
    partition::{PartitionStore, ToggleOutcome},
    shell::{ModalEvent, ModalShell},
    token_store::TokenStore,
    visibility::VisibilityMap,
};

/// File-input id whose selections are posted as the cover image.
pub const COVER_INPUT_ID: &str = "coverUpload";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseBehavior {
    /// Full close: workflow mode to idle, shell collapsed, own flag cleared.
    Collapse,
    /// Clears only the editor's own flag.
    Detach,
}

/// Section editors hosted by the portfolio builder.
pub const STANDARD_EDITORS: [(&str, CloseBehavior); 8] = [
    ("workExperience", CloseBehavior::Collapse),
    ("education", CloseBehavior::Collapse),
    ("projects", CloseBehavior::Collapse),
    ("language", CloseBehavior::Collapse),
    ("interests", CloseBehavior::Collapse),
    ("skills", CloseBehavior::Collapse),
    ("reference", CloseBehavior::Detach),
    ("about", CloseBehavior::Detach),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorState {
    pub state: bool,
    pub error: String,
}

#[derive(Debug, Clone)]
pub enum PortfolioEvent {
    PartitionChanged {
        available: Vec<String>,
        selected: Vec<String>,
    },
    VisibilityChanged {
        id: String,
        open: bool,
    },
    ShellChanged(ModalShell),
    ProfileLoaded {
        user_id: UserId,
    },
    CoverUpdated {
        url: String,
    },
    Redirect {
        path: String,
    },
    Notice(Notice),
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub available: Vec<Section>,
    pub selected: Vec<Section>,
    pub modal_states: VisibilityMap,
    pub shell: ModalShell,
    pub viewer: Option<UserId>,
    pub profile: UserProfile,
    pub user_sections: Vec<UserSectionEntry>,
    pub has_data: bool,
    pub has_portfolio: bool,
    pub error: Option<ErrorState>,
    pub open_delete: bool,
    pub cover_preview: Option<String>,
    pub loading: Vec<LoadingOp>,
}

struct EditorSlot {
    behavior: CloseBehavior,
    visibility: watch::Sender<bool>,
}

struct SessionState {
    partition: PartitionStore,
    visibility: VisibilityMap,
    shell: ModalShell,
    viewer: Option<UserId>,
    token: Option<String>,
    profile: UserProfile,
    user_sections: Vec<UserSectionEntry>,
    has_data: bool,
    has_portfolio: bool,
    error: Option<ErrorState>,
    open_delete: bool,
    cover_preview: Option<String>,
    editors: HashMap<String, EditorSlot>,
}

impl SessionState {
    fn new(catalog: &SectionCatalog) -> Self {
        Self {
            partition: PartitionStore::from_catalog(catalog),
            visibility: VisibilityMap::default(),
            shell: ModalShell::default(),
            viewer: None,
            token: None,
            profile: UserProfile::default(),
            user_sections: Vec::new(),
            has_data: false,
            has_portfolio: false,
            error: None,
            open_delete: false,
            cover_preview: None,
            editors: HashMap::new(),
        }
    }
}

pub(crate) fn publish_notice(events: &broadcast::Sender<PortfolioEvent>, notice: Notice) {
    match notice.severity() {
        Severity::Error => error!(context = ?notice.context(), "{}", notice.message()),
        Severity::Warning => warn!(context = ?notice.context(), "{}", notice.message()),
        Severity::Info | Severity::Success => {
            info!(context = ?notice.context(), "{}", notice.message())
        }
    }
    let _ = events.send(PortfolioEvent::Notice(notice));
}

pub struct PortfolioSession {
    this: Weak<PortfolioSession>,
    api: Arc<dyn PortfolioApi>,
    tokens: Arc<dyn TokenStore>,
    fallback_user_id: UserId,
    redirect_path: String,
    inner: Mutex<SessionState>,
    loading: Arc<LoadingTracker>,
    liveness: Liveness,
    events: broadcast::Sender<PortfolioEvent>,
}

impl PortfolioSession {
    pub fn new(
        api: Arc<dyn PortfolioApi>,
        tokens: Arc<dyn TokenStore>,
        settings: &Settings,
        catalog: SectionCatalog,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new_cyclic(|this| Self {
            this: this.clone(),
            api,
            tokens,
            fallback_user_id: settings.fallback_user_id.clone(),
            redirect_path: settings.redirect_path.clone(),
            inner: Mutex::new(SessionState::new(&catalog)),
            loading: LoadingTracker::new(),
            liveness: Liveness::new(),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<PortfolioEvent> {
        self.events.subscribe()
    }

    pub fn loading(&self) -> &Arc<LoadingTracker> {
        &self.loading
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn is_live(&self) -> bool {
        self.liveness.is_live()
    }

    /// Stops all further state writes. Calls already in flight finish their
    /// network work but their results are discarded.
    pub fn shutdown(&self) {
        if self.liveness.shutdown() {
            info!("portfolio session shut down");
        }
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.inner.lock().await;
        SessionSnapshot {
            available: state.partition.available().to_vec(),
            selected: state.partition.selected().to_vec(),
            modal_states: state.visibility.clone(),
            shell: state.shell,
            viewer: state.viewer.clone(),
            profile: state.profile.clone(),
            user_sections: state.user_sections.clone(),
            has_data: state.has_data,
            has_portfolio: state.has_portfolio,
            error: state.error.clone(),
            open_delete: state.open_delete,
            cover_preview: state.cover_preview.clone(),
            loading: self.loading.active(),
        }
    }

    pub async fn refreshed_token(&self) -> Option<String> {
        self.inner.lock().await.token.clone()
    }

    fn emit(&self, event: PortfolioEvent) {
        let _ = self.events.send(event);
    }

    fn report(&self, notice: Notice) {
        publish_notice(&self.events, notice);
    }

    async fn live_state(&self) -> Result<MutexGuard<'_, SessionState>> {
        let state = self.inner.lock().await;
        if !self.liveness.is_live() {
            debug!("dropping state write on a shut down session");
            return Err(PortfolioError::SessionClosed);
        }
        Ok(state)
    }

    fn set_visibility(&self, state: &mut SessionState, id: &str, open: bool) {
        let changed = if open {
            state.visibility.open(id)
        } else {
            state.visibility.close(id)
        };
        if !changed {
            return;
        }
        if let Some(slot) = state.editors.get(id) {
            slot.visibility.send_replace(open);
        }
        debug!(editor = id, open, "visibility changed");
        self.emit(PortfolioEvent::VisibilityChanged {
            id: id.to_string(),
            open,
        });
    }

    fn apply_modal(&self, state: &mut SessionState, event: ModalEvent) {
        if state.shell.apply(event) {
            debug!(?event, shell = ?state.shell.shell, mode = ?state.shell.mode, "shell transition");
            self.emit(PortfolioEvent::ShellChanged(state.shell));
        }
    }

    fn emit_partition(&self, partition: &PartitionStore) {
        let titles = |sections: &[Section]| -> Vec<String> {
            sections.iter().map(|s| s.title.clone()).collect()
        };
        self.emit(PortfolioEvent::PartitionChanged {
            available: titles(partition.available()),
            selected: titles(partition.selected()),
        });
    }

    pub async fn toggle_section(&self, title: &str) -> Result<ToggleOutcome> {
        let mut state = self.live_state().await?;
        let outcome = match state.partition.toggle(title) {
            Ok(outcome) => outcome,
            Err(err) => {
                drop(state);
                self.report(Notice::warning(NoticeContext::ToggleSection, err.to_string()));
                return Err(err);
            }
        };

        match outcome.section() {
            None => {
                info!("custom section requested; opening generic editor");
                self.apply_modal(&mut state, ModalEvent::OpenShell);
            }
            Some(section) => {
                info!(section = %section.title, ?outcome, "section toggled");
                self.apply_modal(&mut state, ModalEvent::CollapseShell);
                self.set_visibility(&mut state, &section.id, false);
                self.emit_partition(&state.partition);
            }
        }
        Ok(outcome)
    }

    pub async fn edit_section(&self, id: &str) -> Result<()> {
        let mut state = self.live_state().await?;
        self.set_visibility(&mut state, id, true);
        Ok(())
    }

    /// Full editor dismissal: workflow mode to idle, shell collapsed, and the
    /// named editor's flag cleared. Other editors keep their flags.
    pub async fn close_section(&self, id: Option<&str>) -> Result<()> {
        let mut state = self.live_state().await?;
        self.apply_modal(&mut state, ModalEvent::CloseEditor);
        if let Some(id) = id {
            self.set_visibility(&mut state, id, false);
        }
        Ok(())
    }

    pub async fn detach_editor(&self, id: &str) -> Result<()> {
        let mut state = self.live_state().await?;
        self.set_visibility(&mut state, id, false);
        Ok(())
    }

    pub async fn profile_update(&self) -> Result<()> {
        self.modal_event(ModalEvent::ProfileUpdate).await
    }

    pub async fn build_portfolio(&self) -> Result<()> {
        self.modal_event(ModalEvent::BuildPortfolio).await
    }

    pub async fn view_templates(&self) -> Result<()> {
        self.modal_event(ModalEvent::ViewTemplates).await
    }

    pub async fn open_shell(&self) -> Result<()> {
        self.modal_event(ModalEvent::OpenShell).await
    }

    async fn modal_event(&self, event: ModalEvent) -> Result<()> {
        let mut state = self.live_state().await?;
        self.apply_modal(&mut state, event);
        Ok(())
    }

    pub async fn set_open_delete(&self, open: bool) -> Result<()> {
        self.live_state().await?.open_delete = open;
        Ok(())
    }

    pub async fn register_editor(
        &self,
        id: &str,
        behavior: CloseBehavior,
    ) -> Result<SectionEditorHandle> {
        let mut state = self.live_state().await?;
        let current = state.visibility.is_open(id);
        let slot = state.editors.entry(id.to_string()).or_insert_with(|| EditorSlot {
            behavior,
            visibility: watch::channel(current).0,
        });
        slot.behavior = behavior;
        Ok(SectionEditorHandle {
            id: id.to_string(),
            behavior,
            visibility: slot.visibility.subscribe(),
            session: self.this.clone(),
        })
    }

    pub async fn register_standard_editors(&self) -> Result<Vec<SectionEditorHandle>> {
        let mut handles = Vec::with_capacity(STANDARD_EDITORS.len());
        for (id, behavior) in STANDARD_EDITORS {
            handles.push(self.register_editor(id, behavior).await?);
        }
        Ok(handles)
    }

    async fn close_editor(&self, id: &str) -> Result<()> {
        let behavior = self
            .inner
            .lock()
            .await
            .editors
            .get(id)
            .map(|slot| slot.behavior)
            .ok_or_else(|| PortfolioError::UnknownEditor(id.to_string()))?;
        match behavior {
            CloseBehavior::Collapse => self.close_section(Some(id)).await,
            CloseBehavior::Detach => self.detach_editor(id).await,
        }
    }

    /// Resolves the viewer from the stored token. Any failure falls through
    /// to an unauthenticated session.
    pub async fn resolve_identity(&self) -> Option<ResolvedIdentity> {
        let token = match self.tokens.load() {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("no stored auth token; continuing unauthenticated");
                return None;
            }
            Err(err) => {
                warn!(error = %err, "failed to read auth token; continuing unauthenticated");
                return None;
            }
        };

        match self.api.verify_token(&token).await {
            Ok(response) => match response.into_identity() {
                Some(identity) => {
                    info!(user_id = %identity.user_id, "viewer identity resolved");
                    Some(identity)
                }
                None => {
                    debug!("token verification returned no user; continuing unauthenticated");
                    None
                }
            },
            Err(err) => {
                debug!(error = %err, "token verification failed; continuing unauthenticated");
                None
            }
        }
    }

    /// Identity first, then profile + sections for the viewer (or the fallback
    /// user when unauthenticated). A `target` that differs from the viewer is
    /// fetched as well and followed by a redirect.
    pub async fn start_session(&self, target: Option<UserId>) -> Result<()> {
        let _loading = self.loading.begin(LoadingOp::Identity);
        let identity = self.resolve_identity().await;
        {
            let mut state = self.live_state().await?;
            state.viewer = identity.as_ref().map(|id| id.user_id.clone());
            state.token = identity.as_ref().and_then(|id| id.refreshed_token.clone());
        }

        let viewer = identity.as_ref().map(|id| &id.user_id);
        let primary = viewer
            .cloned()
            .unwrap_or_else(|| self.fallback_user_id.clone());
        let mut outcome = self.fetch_profile(&primary).await;

        if let Some(target) = target.filter(|target| Some(target) != viewer) {
            info!(target = %target, viewer = %primary, "viewing another portfolio; refetching");
            match self.fetch_profile(&target).await {
                Ok(()) if self.liveness.is_live() => {
                    self.emit(PortfolioEvent::Redirect {
                        path: self.redirect_path.clone(),
                    });
                }
                Ok(()) => {}
                Err(err) => outcome = outcome.and(Err(err)),
            }
        }
        outcome
    }

    /// Fetches the profile summary and section contents together. Nothing is
    /// written unless both succeed; a failure is recorded in the error state.
    pub async fn fetch_profile(&self, user_id: &UserId) -> Result<()> {
        let _loading = self.loading.begin(LoadingOp::Profile);
        info!(user_id = %user_id, "fetching profile and portfolio sections");
        let fetched = futures::try_join!(
            self.api.get_user(user_id),
            self.api.get_portfolio_details(user_id)
        );

        let mut state = self.live_state().await?;
        match fetched {
            Ok((summary, details)) => {
                state.profile = summary.into_profile();
                state.user_sections = details.into_user_sections();
                state.has_data = true;
                state.has_portfolio = true;
                drop(state);
                self.emit(PortfolioEvent::ProfileLoaded {
                    user_id: user_id.clone(),
                });
                Ok(())
            }
            Err(err) => {
                state.error = Some(ErrorState {
                    state: true,
                    error: err.to_string(),
                });
                drop(state);
                self.report(Notice::error(
                    NoticeContext::FetchProfile,
                    format!("failed to load portfolio for {user_id}: {err}"),
                ));
                Err(err)
            }
        }
    }

    /// Posts a new cover image for the fixed upload user. A failure leaves
    /// the cover and the error state untouched and is only reported as a
    /// warning notice.
    pub async fn upload_cover(&self, upload: CoverUpload) -> Result<()> {
        let _loading = self.loading.begin(LoadingOp::CoverUpload);
        let filename = upload.filename.clone();
        let uploaded = self
            .api
            .upload_cover(&self.fallback_user_id, upload)
            .await
            .and_then(|response| {
                response
                    .data
                    .and_then(|data| data.profile_pic)
                    .ok_or_else(|| {
                        PortfolioError::Validation(
                            "cover upload response carried no image url".into(),
                        )
                    })
            });

        let url = match uploaded {
            Ok(url) => url,
            Err(err) => {
                self.report(Notice::warning(
                    NoticeContext::UploadCover,
                    format!("cover upload of '{filename}' failed: {err}"),
                ));
                return Err(err);
            }
        };

        let mut state = self.live_state().await?;
        state.profile.cover_image = url.clone();
        state.has_data = true;
        drop(state);
        info!(file = %filename, url = %url, "cover image updated");
        self.emit(PortfolioEvent::CoverUpdated { url });
        Ok(())
    }

    /// File-input entry point: records a local preview, then uploads. Only
    /// the cover input triggers an upload.
    pub async fn handle_upload_cover(&self, input_id: &str, upload: CoverUpload) -> Result<()> {
        if input_id != COVER_INPUT_ID {
            debug!(input_id, "ignoring file selection from non-cover input");
            return Ok(());
        }
        self.live_state().await?.cover_preview = Some(upload.filename.clone());
        self.upload_cover(upload).await
    }

    /// Education editor bound to the viewer, or the fallback user when
    /// unauthenticated.
    pub async fn education_editor(&self) -> EducationEditor {
        let user_id = self
            .inner
            .lock()
            .await
            .viewer
            .clone()
            .unwrap_or_else(|| self.fallback_user_id.clone());
        EducationEditor::new(
            Arc::clone(&self.api),
            user_id,
            self.events.clone(),
            Arc::clone(&self.loading),
        )
    }
}

/// An editor's view of the session: its own visibility and a close callback.
pub struct SectionEditorHandle {
    id: String,
    behavior: CloseBehavior,
    visibility: watch::Receiver<bool>,
    session: Weak<PortfolioSession>,
}

impl SectionEditorHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn behavior(&self) -> CloseBehavior {
        self.behavior
    }

    pub fn is_open(&self) -> bool {
        *self.visibility.borrow()
    }

    /// Waits for the next visibility change and returns the new value.
    pub async fn changed(&mut self) -> Result<bool> {
        self.visibility
            .changed()
            .await
            .map_err(|_| PortfolioError::SessionClosed)?;
        Ok(*self.visibility.borrow_and_update())
    }

    pub async fn close(&self) -> Result<()> {
        let session = self.session.upgrade().ok_or(PortfolioError::SessionClosed)?;
        session.close_editor(&self.id).await
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
