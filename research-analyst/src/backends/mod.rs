//! External collaborators: the language model and the web search provider
//!
//! The workflow only sees the two traits defined here. Concrete HTTP adapters
//! live in [`openai_compat`] and [`tavily`]; tests plug in scripted doubles.

pub mod openai_compat;
pub mod tavily;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use openai_compat::OpenAiCompatibleModel;
pub use tavily::TavilySearch;

/// Errors from the language model backend. All of them abort a run.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Authentication failed for language model provider")]
    Auth,

    #[error("Rate limited by language model provider")]
    RateLimited,

    #[error("Language model API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Language model request failed: {message}")]
    Request { message: String },

    #[error("Language model response parse error: {message}")]
    ResponseParse { message: String },
}

/// Errors from the search backend.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("Authentication failed for search provider")]
    Auth,

    #[error("Rate limited by search provider")]
    RateLimited,

    #[error("Search API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Search request failed: {message}")]
    Request { message: String },

    #[error("Search response parse error: {message}")]
    ResponseParse { message: String },
}

impl SearchError {
    /// Fatal errors abort the run; everything else is absorbed per query.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SearchError::Auth)
    }
}

/// Text-completion backend: one prompt in, free text out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Web search backend: one query in, ranked hits out.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError>;
}

/// A single search hit. Missing fields are already defaulted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub url: String,
    pub content: String,
    pub score: f64,
}

impl SearchHit {
    pub fn new(url: impl Into<String>, content: impl Into<String>, score: f64) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
            score,
        }
    }

    fn from_value(value: &Value) -> Self {
        Self {
            url: value
                .get("url")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            content: value
                .get("content")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            score: value.get("score").and_then(Value::as_f64).unwrap_or(0.0),
        }
    }
}

/// Search backend response: `{ "results": [ {url, content, score}, ... ] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<SearchHit>,
}

impl SearchResponse {
    pub fn new(results: Vec<SearchHit>) -> Self {
        Self { results }
    }

    /// Lenient parse of a raw backend body. A missing or non-array `results`
    /// yields no hits; malformed hit fields default to "" / 0.0.
    pub fn from_value(value: &Value) -> Self {
        let results = value
            .get("results")
            .and_then(Value::as_array)
            .map(|hits| hits.iter().map(SearchHit::from_value).collect())
            .unwrap_or_default();
        Self { results }
    }
}
