//! Note collection repository over local key-value storage.
//!
//! # Responsibility
//! - Read/write the full note collection as one JSON array blob.
//! - Provide whole-collection upsert/remove semantics.
//!
//! # Invariants
//! - Every write persists the entire collection under one key.
//! - `list_all` fails soft: missing, unreadable, or malformed data yields
//!   an empty collection.
//! - Writes never rebuild the collection from a failed storage read; a
//!   read error aborts the write. Missing or malformed data counts as empty.
//! - Writes enforce `Note::validate()` before touching storage.

use crate::model::note::{Note, NoteValidationError};
use crate::repo::kv_store::{KeyValueStore, KvError};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Fixed storage namespace holding the serialized collection.
pub const NOTES_STORAGE_KEY: &str = "niro-notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for note write paths.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Storage(KvError),
    Serialize(serde_json::Error),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Serialize(err) => write!(f, "failed to serialize notes: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Storage(err) => Some(err),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<KvError> for RepoError {
    fn from(value: KvError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Repository interface for the durable note collection.
pub trait NoteRepository {
    /// Returns the full collection in storage order. Never fails.
    fn list_all(&self) -> Vec<Note>;
    /// Replaces the note with the same id, or appends it.
    fn upsert(&mut self, note: &Note) -> RepoResult<()>;
    /// Removes the note with `id`; unknown ids are a no-op.
    fn remove(&mut self, id: &str) -> RepoResult<()>;
}

/// Note repository storing the collection as one blob in a key-value store.
pub struct KvNoteRepository<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> KvNoteRepository<S> {
    /// Creates a repository using the default `niro-notes` namespace.
    pub fn new(store: S) -> Self {
        Self::with_key(store, NOTES_STORAGE_KEY)
    }

    /// Creates a repository bound to a custom namespace key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Loads the collection a write will rebuild from.
    fn load_for_write(&self) -> RepoResult<Vec<Note>> {
        let Some(blob) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        Ok(parse_or_empty(&blob))
    }

    fn persist(&mut self, notes: &[Note]) -> RepoResult<()> {
        let blob = serde_json::to_string(notes)?;
        self.store.set(&self.key, &blob)?;
        debug!(
            "event=notes_persist module=repo status=ok count={}",
            notes.len()
        );
        Ok(())
    }
}

impl<S: KeyValueStore> NoteRepository for KvNoteRepository<S> {
    fn list_all(&self) -> Vec<Note> {
        let blob = match self.store.get(&self.key) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(
                    "event=notes_load module=repo status=error error_code=storage_read_failed error={}",
                    err
                );
                return Vec::new();
            }
        };

        parse_or_empty(&blob)
    }

    fn upsert(&mut self, note: &Note) -> RepoResult<()> {
        note.validate()?;

        let mut notes = self.load_for_write()?;
        match notes.iter_mut().find(|existing| existing.id == note.id) {
            Some(existing) => *existing = note.clone(),
            None => notes.push(note.clone()),
        }
        self.persist(&notes)
    }

    fn remove(&mut self, id: &str) -> RepoResult<()> {
        let mut notes = self.load_for_write()?;
        notes.retain(|note| note.id != id);
        self.persist(&notes)
    }
}

fn parse_collection(blob: &str) -> Result<Vec<Note>, serde_json::Error> {
    serde_json::from_str::<Vec<Note>>(blob)
}

fn parse_or_empty(blob: &str) -> Vec<Note> {
    match parse_collection(blob) {
        Ok(notes) => notes,
        Err(err) => {
            warn!(
                "event=notes_load module=repo status=error error_code=malformed_blob error={}",
                err
            );
            Vec::new()
        }
    }
}
