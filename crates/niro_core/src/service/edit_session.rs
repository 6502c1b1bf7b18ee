//! Single-note edit session.
//!
//! # Responsibility
//! - Track a draft against its last-saved snapshot (clean/dirty gate).
//! - Append generated summaries to the draft content.
//! - Commit the draft through `NoteService`.
//!
//! # Invariants
//! - Dirty state is structural equality of title, content and color.
//! - A failed summary leaves the draft untouched.
//! - An unavailable summarizer is never called.
//! - A successful save makes the session clean and binds it to the saved id.

use crate::model::note::{Note, NoteDraft, NoteId};
use crate::repo::note_repo::NoteRepository;
use crate::service::note_service::{NoteService, NoteServiceError};
use crate::summarize::{SummarizeError, SummarizeResult, Summarizer};

const SUMMARY_SEPARATOR: &str = "\n\n--- AI Summary ---\n";

/// Whether the draft differs from the last-saved snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Clean,
    Dirty,
}

/// Outcome of a summary request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryOutcome {
    /// Summary appended to the draft content.
    Appended,
    /// Draft content is empty; nothing to summarize.
    Skipped,
}

/// Edit state for one new or existing note.
#[derive(Debug, Clone)]
pub struct EditSession {
    target: Option<NoteId>,
    snapshot: NoteDraft,
    draft: NoteDraft,
}

impl EditSession {
    /// Starts editing a new note with default fields.
    pub fn new_note() -> Self {
        Self {
            target: None,
            snapshot: NoteDraft::default(),
            draft: NoteDraft::default(),
        }
    }

    /// Starts editing an existing note.
    pub fn edit(note: &Note) -> Self {
        let snapshot = note.draft();
        Self {
            target: Some(note.id.clone()),
            draft: snapshot.clone(),
            snapshot,
        }
    }

    /// Id of the note being edited, `None` until a new note is first saved.
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    pub fn draft(&self) -> &NoteDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut NoteDraft {
        &mut self.draft
    }

    pub fn state(&self) -> EditState {
        if self.draft == self.snapshot {
            EditState::Clean
        } else {
            EditState::Dirty
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.state() == EditState::Dirty
    }

    /// Asks `summarizer` for a summary of the draft content and appends it.
    ///
    /// Errors leave the draft unchanged and are non-fatal for the session.
    pub async fn summarize(
        &mut self,
        summarizer: &dyn Summarizer,
    ) -> SummarizeResult<SummaryOutcome> {
        if self.draft.content.is_empty() {
            return Ok(SummaryOutcome::Skipped);
        }
        if !summarizer.is_available() {
            return Err(SummarizeError::Unavailable);
        }
        let summary = summarizer.summarize(&self.draft.content).await?;
        self.append_summary(&summary);
        Ok(SummaryOutcome::Appended)
    }

    /// Appends a summary block to the draft content.
    pub fn append_summary(&mut self, summary: &str) {
        self.draft.content.push_str(SUMMARY_SEPARATOR);
        self.draft.content.push_str(summary);
    }

    /// Saves the draft and marks the session clean.
    pub fn save<R: NoteRepository>(
        &mut self,
        service: &mut NoteService<R>,
        now_ms: i64,
    ) -> Result<Note, NoteServiceError> {
        let saved = service.save(self.target.as_deref(), self.draft.clone(), now_ms)?;
        self.target = Some(saved.id.clone());
        self.snapshot = saved.draft();
        self.draft = self.snapshot.clone();
        Ok(saved)
    }
}
