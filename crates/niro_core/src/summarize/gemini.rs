//! Gemini `generateContent` summarizer.
//!
//! # Responsibility
//! - Send one prompt per summary request and extract the reply text.
//!
//! # Invariants
//! - The API key is sent as a header, never in the URL.
//! - No request timeout is set here; the provider call may fail on its own.

use super::{summary_prompt, SummarizeError, SummarizeResult, Summarizer};
use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Connection settings for the Gemini API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    /// Blank or missing keys make the summarizer unavailable.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text = content
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<String>();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// Summarizer backed by Google's Gemini API.
pub struct GeminiSummarizer {
    client: Client,
    config: GeminiConfig,
}

impl GeminiSummarizer {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    fn is_available(&self) -> bool {
        self.api_key().is_some()
    }

    async fn summarize(&self, text: &str) -> SummarizeResult<String> {
        let Some(api_key) = self.api_key() else {
            return Err(SummarizeError::Unavailable);
        };

        let started_at = Instant::now();
        let prompt = summary_prompt(text);
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: &prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                "event=summarize module=summarize status=error model={} http_status={} duration_ms={}",
                self.config.model,
                status.as_u16(),
                started_at.elapsed().as_millis()
            );
            return Err(SummarizeError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let summary = parsed.into_text().ok_or(SummarizeError::EmptyResponse)?;
        info!(
            "event=summarize module=summarize status=ok model={} input_chars={} output_chars={} duration_ms={}",
            self.config.model,
            text.chars().count(),
            summary.chars().count(),
            started_at.elapsed().as_millis()
        );
        Ok(summary)
    }
}
