//! Note use-case service.
//!
//! # Responsibility
//! - Own the in-memory note collection for one session.
//! - Re-sync the repository on every create/update/delete.
//! - Derive list previews and filtered/sorted views.
//!
//! # Invariants
//! - The collection is loaded once, at construction.
//! - The in-memory collection changes only after the repository write
//!   succeeded.
//! - Saving preserves `id` and `created_at` of an existing note.

use crate::model::note::{Note, NoteDraft, NoteId, NoteValidationError};
use crate::repo::note_repo::{NoteRepository, RepoError};
use crate::search::query::{query_notes, SortMode};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Display fallback for notes without a title.
pub const UNTITLED_NOTE: &str = "Untitled Note";

const PREVIEW_MAX_CHARS: usize = 150;

static TRAILING_WS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+\n").expect("valid trailing ws regex"));

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Both title and content are empty; nothing was persisted.
    EmptyNote,
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNote => write!(f, "empty notes are not saved"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(NoteValidationError::EmptyNote) => Self::EmptyNote,
            other => Self::Repo(other),
        }
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
    notes: Vec<Note>,
}

impl<R: NoteRepository> NoteService<R> {
    /// Loads the full collection from `repo`.
    pub fn load(repo: R) -> Self {
        let notes = repo.list_all();
        info!(
            "event=notes_load module=service status=ok count={}",
            notes.len()
        );
        Self { repo, notes }
    }

    /// Returns the collection in storage order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Gets one note by id.
    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Returns the filtered and ordered view of the collection.
    pub fn view(&self, term: &str, sort: SortMode) -> Vec<&Note> {
        query_notes(&self.notes, term, sort)
    }

    /// Saves a draft as a new note (`target = None`) or over an existing one.
    ///
    /// # Errors
    /// - `EmptyNote` when title and content are both empty.
    /// - `NoteNotFound` when `target` does not exist.
    pub fn save(
        &mut self,
        target: Option<&str>,
        draft: NoteDraft,
        now_ms: i64,
    ) -> Result<Note, NoteServiceError> {
        if draft.is_empty() {
            return Err(NoteServiceError::EmptyNote);
        }

        let note = match target {
            Some(id) => {
                let mut note = self
                    .get(id)
                    .cloned()
                    .ok_or_else(|| NoteServiceError::NoteNotFound(id.to_string()))?;
                note.apply(draft, now_ms);
                note
            }
            None => Note::new(draft, now_ms),
        };

        self.repo.upsert(&note)?;
        match self.notes.iter_mut().find(|existing| existing.id == note.id) {
            Some(existing) => *existing = note.clone(),
            None => self.notes.push(note.clone()),
        }

        info!(
            "event=note_save module=service status=ok mode={} count={}",
            if target.is_some() { "update" } else { "create" },
            self.notes.len()
        );
        Ok(note)
    }

    /// Deletes a note. Returns the removed note, or `None` for unknown ids.
    pub fn delete(&mut self, id: &str) -> Result<Option<Note>, NoteServiceError> {
        self.repo.remove(id)?;
        let position = self.notes.iter().position(|note| note.id == id);
        let removed = position.map(|index| self.notes.remove(index));
        info!(
            "event=note_delete module=service status=ok found={} count={}",
            removed.is_some(),
            self.notes.len()
        );
        Ok(removed)
    }
}

/// Returns the list-view title for a note.
pub fn display_title(note: &Note) -> &str {
    if note.title.is_empty() {
        UNTITLED_NOTE
    } else {
        &note.title
    }
}

/// Derives the list-view content preview.
///
/// Rules:
/// - trailing spaces before line breaks are dropped.
/// - content longer than 150 chars is cut and suffixed with `...`.
pub fn derive_preview(content: &str) -> String {
    let normalized = TRAILING_WS_RE.replace_all(content, "\n");
    if normalized.chars().count() <= PREVIEW_MAX_CHARS {
        return normalized.into_owned();
    }
    let mut preview = normalized.chars().take(PREVIEW_MAX_CHARS).collect::<String>();
    preview.push_str("...");
    preview
}
