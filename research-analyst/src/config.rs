//! Backend configuration sourced from the environment
//!
//! Credentials and model selection come from environment variables, optionally
//! loaded from a `.env` file by the binary before [`BackendConfig::from_env`] runs.

use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_SEARCH_BASE_URL: &str = "https://api.tavily.com";
pub const DEFAULT_SEARCH_DEPTH: &str = "advanced";
pub const DEFAULT_MAX_RESULTS: u32 = 5;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Language model endpoint settings
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

/// Search endpoint settings
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub api_key: String,
    pub base_url: String,
    pub search_depth: String,
    pub max_results: u32,
}

/// Everything the HTTP backends need
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub llm: LlmSettings,
    pub search: SearchSettings,
    /// Upper bound for a single backend HTTP call
    pub timeout: Duration,
}

impl BackendConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    /// Build configuration from an explicit variable map
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let llm_key = get("GROQ_API_KEY")
            .or_else(|| get("LLM_API_KEY"))
            .ok_or_else(|| anyhow!("GROQ_API_KEY (or LLM_API_KEY) is not set"))?;
        let search_key =
            get("TAVILY_API_KEY").ok_or_else(|| anyhow!("TAVILY_API_KEY is not set"))?;

        let temperature = match get("LLM_TEMPERATURE") {
            Some(raw) => raw
                .parse::<f32>()
                .with_context(|| format!("Invalid LLM_TEMPERATURE: {}", raw))?,
            None => 0.0,
        };
        let max_results = match get("TAVILY_MAX_RESULTS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("Invalid TAVILY_MAX_RESULTS: {}", raw))?,
            None => DEFAULT_MAX_RESULTS,
        };
        let timeout_secs = match get("BACKEND_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("Invalid BACKEND_TIMEOUT_SECS: {}", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            llm: LlmSettings {
                api_key: llm_key,
                base_url: get("LLM_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                model: get("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
                temperature,
            },
            search: SearchSettings {
                api_key: search_key,
                base_url: get("TAVILY_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_SEARCH_BASE_URL.to_string())
                    .trim_end_matches('/')
                    .to_string(),
                search_depth: get("TAVILY_SEARCH_DEPTH")
                    .unwrap_or_else(|| DEFAULT_SEARCH_DEPTH.to_string()),
                max_results,
            },
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}
