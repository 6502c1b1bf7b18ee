//! Core domain logic for Niro Notes.
//! This crate is the single source of truth for note invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod service;
pub mod summarize;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{now_epoch_ms, Note, NoteColor, NoteDraft, NoteId, NoteValidationError};
pub use repo::kv_store::{KeyValueStore, KvError, KvResult, SqliteKeyValueStore};
pub use repo::note_repo::{
    KvNoteRepository, NoteRepository, RepoError, RepoResult, NOTES_STORAGE_KEY,
};
pub use search::query::{query_notes, SortMode};
pub use service::edit_session::{EditSession, EditState, SummaryOutcome};
pub use service::note_service::{
    derive_preview, display_title, NoteService, NoteServiceError, UNTITLED_NOTE,
};
pub use summarize::{
    summary_prompt, GeminiConfig, GeminiSummarizer, SummarizeError, SummarizeResult, Summarizer,
};

