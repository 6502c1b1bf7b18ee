//! Note summarization collaborator.
//!
//! # Responsibility
//! - Define the async string-in/string-out summarization contract.
//! - Classify failures as "unavailable" or "call failed".
//!
//! # Invariants
//! - Availability is checked before every call; an unavailable summarizer
//!   never touches the network.
//! - Returned summaries are trimmed of surrounding whitespace.
//! - Every failure is non-fatal for callers.

use async_trait::async_trait;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod gemini;

pub use gemini::{GeminiConfig, GeminiSummarizer};

const SUMMARY_PROMPT_PREFIX: &str =
    "Summarize the following note in 2-3 concise bullet points:\n\n---\n\n";

pub type SummarizeResult<T> = Result<T, SummarizeError>;

/// Summarization failure.
#[derive(Debug)]
pub enum SummarizeError {
    /// No credential configured.
    Unavailable,
    /// Request could not be sent or its response could not be read.
    Transport(reqwest::Error),
    /// Provider answered with a non-success status.
    Provider { status: u16, body: String },
    /// Provider answered without any summary text.
    EmptyResponse,
}

impl SummarizeError {
    /// Returns whether the failure is a missing-credential precondition
    /// rather than a failed call.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

impl Display for SummarizeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "summarization is unavailable: no API key configured"),
            Self::Transport(err) => write!(f, "summarization call failed: {err}"),
            Self::Provider { status, body } => {
                write!(f, "summarization call failed with status {status}: {body}")
            }
            Self::EmptyResponse => write!(f, "summarization call returned no text"),
        }
    }
}

impl Error for SummarizeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SummarizeError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(value)
    }
}

/// External service condensing note text into a short summary.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Returns whether a credential is configured.
    fn is_available(&self) -> bool;

    /// Summarizes `text`.
    async fn summarize(&self, text: &str) -> SummarizeResult<String>;
}

/// Wraps raw note text in the fixed summarization instruction.
pub fn summary_prompt(text: &str) -> String {
    format!("{SUMMARY_PROMPT_PREFIX}{text}")
}

#[cfg(test)]
mod tests {
    use super::{summary_prompt, SummarizeError};

    #[test]
    fn prompt_wraps_text_after_separator() {
        let prompt = summary_prompt("buy milk");
        assert!(prompt.starts_with("Summarize the following note in 2-3 concise bullet points:"));
        assert!(prompt.ends_with("---\n\nbuy milk"));
    }

    #[test]
    fn only_missing_credential_is_unavailable() {
        assert!(SummarizeError::Unavailable.is_unavailable());
        assert!(!SummarizeError::EmptyResponse.is_unavailable());
    }
}
