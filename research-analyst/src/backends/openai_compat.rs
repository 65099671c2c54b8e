//! OpenAI-compatible chat completion backend (Groq by default)

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{LanguageModel, LlmError};
use crate::config::LlmSettings;

/// Language model reached through a `/chat/completions` endpoint
pub struct OpenAiCompatibleModel {
    client: Client,
    settings: LlmSettings,
}

impl OpenAiCompatibleModel {
    pub fn new(settings: LlmSettings, timeout: std::time::Duration) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Request {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client, settings })
    }

    pub fn model_name(&self) -> &str {
        &self.settings.model
    }

    fn request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.settings.model,
            "temperature": self.settings.temperature,
            "stream": false,
            "messages": [
                {"role": "user", "content": prompt}
            ],
        })
    }

    fn parse_response(body: &Value) -> Result<String, LlmError> {
        body.get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.get("message"))
            .and_then(|message| message.get("content"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| LlmError::ResponseParse {
                message: "No choices[0].message.content in response".to_string(),
            })
    }

    fn map_http_error(status: StatusCode, body: &str) -> LlmError {
        match status.as_u16() {
            401 | 403 => LlmError::Auth,
            429 => LlmError::RateLimited,
            code => LlmError::Api {
                status: code,
                message: body.chars().take(500).collect(),
            },
        }
    }
}

#[async_trait]
impl LanguageModel for OpenAiCompatibleModel {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.settings.base_url);
        debug!(url = %url, model = %self.settings.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.settings.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| LlmError::Request {
                message: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| LlmError::Request {
            message: format!("Failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            warn!(status = %status, "Completion request rejected");
            return Err(Self::map_http_error(status, &text));
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| LlmError::ResponseParse {
            message: format!("Invalid JSON: {}", e),
        })?;
        Self::parse_response(&body)
    }
}
