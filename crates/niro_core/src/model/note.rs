//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical note record persisted in the key-value blob.
//! - Define the fixed color palette used for display grouping.
//! - Validate persistence invariants before any write.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - A note with both `title` and `content` empty is never persisted.
//! - `created_at <= last_modified`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier of a note.
///
/// Kept as an opaque string: persisted collections may carry ids minted by
/// older writers in a different format.
pub type NoteId = String;

/// Fixed tag palette. Serialized as the hex string of each swatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NoteColor {
    #[default]
    Red,
    Amber,
    Lime,
    Green,
    Sky,
    Violet,
    Pink,
    Gray,
}

impl NoteColor {
    /// Palette in display order.
    pub const ALL: [NoteColor; 8] = [
        NoteColor::Red,
        NoteColor::Amber,
        NoteColor::Lime,
        NoteColor::Green,
        NoteColor::Sky,
        NoteColor::Violet,
        NoteColor::Pink,
        NoteColor::Gray,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            Self::Red => "#f87171",
            Self::Amber => "#fbbf24",
            Self::Lime => "#a3e635",
            Self::Green => "#4ade80",
            Self::Sky => "#38bdf8",
            Self::Violet => "#a78bfa",
            Self::Pink => "#f472b6",
            Self::Gray => "#9ca3af",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Amber => "amber",
            Self::Lime => "lime",
            Self::Green => "green",
            Self::Sky => "sky",
            Self::Violet => "violet",
            Self::Pink => "pink",
            Self::Gray => "gray",
        }
    }

    /// Parses a palette name or hex value, case-insensitively.
    pub fn parse(value: &str) -> Option<Self> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|color| color.name() == normalized || color.hex() == normalized)
    }
}

impl From<String> for NoteColor {
    // Unknown persisted swatches degrade to the default color instead of
    // failing the whole collection.
    fn from(value: String) -> Self {
        Self::parse(&value).unwrap_or_default()
    }
}

impl From<NoteColor> for String {
    fn from(value: NoteColor) -> Self {
        value.hex().to_string()
    }
}

impl Display for NoteColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Validation error for note persistence invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Both title and content are empty.
    EmptyNote,
    /// Id is blank.
    EmptyId,
    /// `last_modified` is earlier than `created_at`.
    TimestampsOutOfOrder { created_at: i64, last_modified: i64 },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyNote => write!(f, "note must have a title or content"),
            Self::EmptyId => write!(f, "note id cannot be empty"),
            Self::TimestampsOutOfOrder {
                created_at,
                last_modified,
            } => write!(
                f,
                "lastModified ({last_modified}) is earlier than createdAt ({created_at})"
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// Canonical persisted note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub color: NoteColor,
    /// Unix epoch milliseconds. Set once at creation.
    pub created_at: i64,
    /// Unix epoch milliseconds. Refreshed on every save.
    pub last_modified: i64,
}

impl Note {
    /// Creates a note from draft fields with a freshly generated id.
    ///
    /// Both timestamps are set to `now_ms`.
    pub fn new(draft: NoteDraft, now_ms: i64) -> Self {
        Self::with_id(generate_note_id(), draft, now_ms)
    }

    /// Creates a note with a caller-provided id.
    pub fn with_id(id: impl Into<NoteId>, draft: NoteDraft, now_ms: i64) -> Self {
        Self {
            id: id.into(),
            title: draft.title,
            content: draft.content,
            color: draft.color,
            created_at: now_ms,
            last_modified: now_ms,
        }
    }

    /// Replaces editable fields and refreshes `last_modified`.
    ///
    /// `last_modified` never moves before `created_at`, even if the clock did.
    pub fn apply(&mut self, draft: NoteDraft, now_ms: i64) {
        self.title = draft.title;
        self.content = draft.content;
        self.color = draft.color;
        self.last_modified = now_ms.max(self.created_at);
    }

    /// Returns the editable projection of this note.
    pub fn draft(&self) -> NoteDraft {
        NoteDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            color: self.color,
        }
    }

    /// Checks persistence invariants.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.id.trim().is_empty() {
            return Err(NoteValidationError::EmptyId);
        }
        if self.title.is_empty() && self.content.is_empty() {
            return Err(NoteValidationError::EmptyNote);
        }
        if self.last_modified < self.created_at {
            return Err(NoteValidationError::TimestampsOutOfOrder {
                created_at: self.created_at,
                last_modified: self.last_modified,
            });
        }
        Ok(())
    }
}

/// User-editable fields of a note.
///
/// Equality is structural; it drives the clean/dirty edit gate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub color: NoteColor,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, color: NoteColor) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            color,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.content.is_empty()
    }
}

/// Returns current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

fn generate_note_id() -> NoteId {
    format!("note_{}", Uuid::new_v4().simple())
}
