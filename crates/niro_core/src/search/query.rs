//! In-memory filter and sort over the note collection.
//!
//! # Responsibility
//! - Derive the visible note list from the collection, a search term and a
//!   sort mode.
//!
//! # Invariants
//! - Pure: inputs are never mutated and identical inputs give identical output.
//! - Sorting is stable; ties keep input order.
//! - An empty term matches every note.

use crate::model::note::Note;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Ordering applied to the visible note list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortMode {
    /// `last_modified` descending.
    #[default]
    LastModified,
    /// `created_at` descending.
    CreatedAt,
    /// Title ascending, case-insensitive.
    Title,
}

impl SortMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LastModified => "modified",
            Self::CreatedAt => "created",
            Self::Title => "title",
        }
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "modified" | "last_modified" | "lastmodified" => Ok(Self::LastModified),
            "created" | "created_at" | "createdat" => Ok(Self::CreatedAt),
            "title" => Ok(Self::Title),
            other => Err(format!(
                "unsupported sort mode `{other}`; expected modified|created|title"
            )),
        }
    }
}

/// Returns notes matching `term`, ordered by `sort`.
pub fn query_notes<'a>(notes: &'a [Note], term: &str, sort: SortMode) -> Vec<&'a Note> {
    let needle = term.to_lowercase();
    let mut visible = notes
        .iter()
        .filter(|note| matches_term(note, &needle))
        .collect::<Vec<_>>();

    // `sort_by` is stable.
    visible.sort_by(|a, b| compare(a, b, sort));
    visible
}

/// Returns whether `note` title or content contains the lowercase `needle`.
fn matches_term(note: &Note, needle: &str) -> bool {
    needle.is_empty()
        || note.title.to_lowercase().contains(needle)
        || note.content.to_lowercase().contains(needle)
}

fn compare(a: &Note, b: &Note, sort: SortMode) -> Ordering {
    match sort {
        SortMode::Title => compare_titles(&a.title, &b.title),
        SortMode::CreatedAt => b.created_at.cmp(&a.created_at),
        SortMode::LastModified => b.last_modified.cmp(&a.last_modified),
    }
}

fn compare_titles(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}
