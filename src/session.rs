//! The reconciliation workflow: one session per open editor, mediating
//! between the local draft, the revision history, and the apply gateway.
//!
//! Every operation either fully succeeds or fully no-ops; a failed external
//! call never leaves the draft or the session state partially updated.

use crate::config::Settings;
use crate::constant::DEFAULT_HISTORY_LIMIT;
use crate::diff::{DiffStats, EditScript, calculate_stats, compute_diff, group_into_rows};
use crate::gateway::{ApplyError, ApplyGateway, ApplyMode, ApplyOptions, FormatError, Formatter};
use crate::history::{HistoryError, ResourceKey, Revision, RevisionHistoryStore};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Apply(#[from] ApplyError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("No revision selected")]
    NoRevisionSelected,

    #[error("Unknown revision id: {0}")]
    UnknownRevision(String),

    #[error("Operation not allowed in {0:?} state")]
    InvalidState(SessionState),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Draft is being edited locally; no revision selected
    Editing,
    /// History panel open, revisions loaded newest first
    Browsing,
    /// A diff between the draft and the selected revision is on display
    Reviewing,
    /// A rollback apply call is in flight
    Applying,
}

/// The diff on display for the selected revision
#[derive(Debug, Clone)]
pub struct Review {
    pub revision_id: String,
    pub script: EditScript,
    pub stats: DiffStats,
}

/// One editing session for one resource.
///
/// Owns the draft and all browsing state; collaborators are borrowed for the
/// session's lifetime. Dropping the session closes the editor — no side
/// effects beyond what was already applied.
pub struct ReconciliationSession<'a> {
    id: Uuid,
    resource: ResourceKey,
    store: &'a dyn RevisionHistoryStore,
    gateway: &'a dyn ApplyGateway,
    formatter: &'a dyn Formatter,
    history_limit: usize,
    dry_run_before_rollback: bool,
    state: SessionState,
    draft: String,
    revisions: Vec<Revision>,
    selected: Option<usize>,
    review: Option<Review>,
}

impl<'a> ReconciliationSession<'a> {
    pub fn new(
        resource: ResourceKey,
        draft: impl Into<String>,
        store: &'a dyn RevisionHistoryStore,
        gateway: &'a dyn ApplyGateway,
        formatter: &'a dyn Formatter,
    ) -> Self {
        let id = Uuid::new_v4();
        info!("Open session {} for {:?}", id, resource);
        Self {
            id,
            resource,
            store,
            gateway,
            formatter,
            history_limit: DEFAULT_HISTORY_LIMIT,
            dry_run_before_rollback: false,
            state: SessionState::Editing,
            draft: draft.into(),
            revisions: Vec::new(),
            selected: None,
            review: None,
        }
    }

    /// Apply user settings to this session
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.history_limit = settings.history_limit;
        self.dry_run_before_rollback = settings.dry_run_before_rollback;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn resource(&self) -> &ResourceKey {
        &self.resource
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the draft with a local edit; does not touch browsing state
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
        self.review = None;
    }

    pub fn revisions(&self) -> &[Revision] {
        &self.revisions
    }

    pub fn selected_revision(&self) -> Option<&Revision> {
        self.selected.and_then(|i| self.revisions.get(i))
    }

    pub fn review(&self) -> Option<&Review> {
        self.review.as_ref()
    }

    /// Open the history panel: fetch recent revisions, newest first, and
    /// select the most recent one. On fetch failure the session is left
    /// exactly as it was.
    pub fn open_history(&mut self) -> Result<&[Revision], ReconcileError> {
        match self.state {
            SessionState::Editing | SessionState::Browsing => {}
            state => return Err(ReconcileError::InvalidState(state)),
        }

        let revisions = self.store.list(&self.resource, self.history_limit).map_err(|e| {
            warn!("Session {}: history fetch failed: {}", self.id, e);
            e
        })?;

        info!("Session {}: loaded {} revisions", self.id, revisions.len());
        self.selected = if revisions.is_empty() { None } else { Some(0) };
        self.revisions = revisions;
        self.review = None;
        self.state = SessionState::Browsing;
        Ok(&self.revisions)
    }

    /// Select a revision from the loaded list. Re-selecting while reviewing
    /// drops the now-stale review and returns to browsing.
    pub fn select_revision(&mut self, id: &str) -> Result<(), ReconcileError> {
        match self.state {
            SessionState::Browsing | SessionState::Reviewing => {}
            state => return Err(ReconcileError::InvalidState(state)),
        }

        let index = self
            .revisions
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| ReconcileError::UnknownRevision(id.to_string()))?;

        self.selected = Some(index);
        self.review = None;
        self.state = SessionState::Browsing;
        Ok(())
    }

    /// Compute the diff between the current draft and the selected
    /// revision's text and keep it on display.
    pub fn preview_diff(&mut self) -> Result<&Review, ReconcileError> {
        match self.state {
            SessionState::Browsing | SessionState::Reviewing => {}
            state => return Err(ReconcileError::InvalidState(state)),
        }
        let (revision_id, revision_text) = {
            let revision = self
                .selected_revision()
                .ok_or(ReconcileError::NoRevisionSelected)?;
            (revision.id.clone(), revision.text.clone())
        };

        let script = compute_diff(&self.draft, &revision_text);
        let stats = calculate_stats(&group_into_rows(&script));
        self.state = SessionState::Reviewing;
        Ok(self.review.insert(Review {
            revision_id,
            script,
            stats,
        }))
    }

    /// Close the history panel without touching the draft
    pub fn close_history(&mut self) {
        self.revisions.clear();
        self.selected = None;
        self.review = None;
        self.state = SessionState::Editing;
    }

    /// Load a revision's text into the draft. Purely local: no gateway
    /// call, no new revision, no effect on the live resource. Idempotent.
    pub fn restore(&mut self, text: &str) {
        info!("Session {}: restore into draft", self.id);
        self.draft = text.to_string();
        self.close_history();
    }

    /// Apply a revision's text to the live system, then mirror it into the
    /// draft and close the history panel. On failure the session is left
    /// byte-identical to before the call; the apply is never retried here.
    pub fn rollback(&mut self, text: &str) -> Result<(), ReconcileError> {
        if self.state == SessionState::Applying {
            return Err(ReconcileError::InvalidState(self.state));
        }
        let prior = self.state;
        self.state = SessionState::Applying;

        let namespace = self.resource.namespace.clone();
        if self.dry_run_before_rollback
            && let Err(e) = self
                .gateway
                .apply(text, &ApplyOptions::dry_run(ApplyMode::Rollback, namespace.clone()))
        {
            warn!("Session {}: rollback dry run failed: {}", self.id, e);
            self.state = prior;
            return Err(e.into());
        }

        match self
            .gateway
            .apply(text, &ApplyOptions::real(ApplyMode::Rollback, namespace))
        {
            Ok(()) => {
                info!("Session {}: rollback applied", self.id);
                self.draft = text.to_string();
                self.close_history();
                Ok(())
            }
            Err(e) => {
                warn!("Session {}: rollback failed: {}", self.id, e);
                self.state = prior;
                Err(e.into())
            }
        }
    }

    /// Dry-run apply of the current draft. Reports the outcome; never
    /// mutates the live resource or the session.
    pub fn validate(&self) -> Result<(), ReconcileError> {
        let options = ApplyOptions::dry_run(ApplyMode::Update, self.resource.namespace.clone());
        self.gateway.apply(&self.draft, &options).map_err(|e| {
            warn!("Session {}: validation failed: {}", self.id, e);
            e.into()
        })
    }

    /// Format the draft through the external formatter; on failure the
    /// draft is left untouched.
    pub fn format_draft(&mut self) -> Result<(), ReconcileError> {
        let formatted = self.formatter.format(&self.draft).map_err(|e| {
            warn!("Session {}: format failed: {}", self.id, e);
            e
        })?;
        self.draft = formatted;
        self.review = None;
        Ok(())
    }
}
