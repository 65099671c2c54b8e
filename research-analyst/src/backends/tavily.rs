//! Tavily web search backend

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{SearchError, SearchProvider, SearchResponse};
use crate::config::SearchSettings;

pub struct TavilySearch {
    client: Client,
    settings: SearchSettings,
}

impl TavilySearch {
    pub fn new(settings: SearchSettings, timeout: std::time::Duration) -> Result<Self, SearchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Request {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client, settings })
    }

    fn request_body(&self, query: &str) -> Value {
        json!({
            "api_key": self.settings.api_key,
            "query": query,
            "search_depth": self.settings.search_depth,
            "max_results": self.settings.max_results,
        })
    }

    fn map_http_error(status: StatusCode, body: &str) -> SearchError {
        match status.as_u16() {
            401 | 403 => SearchError::Auth,
            429 => SearchError::RateLimited,
            code => SearchError::Api {
                status: code,
                message: body.chars().take(500).collect(),
            },
        }
    }
}

#[async_trait]
impl SearchProvider for TavilySearch {
    async fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let url = format!("{}/search", self.settings.base_url);
        debug!(url = %url, query = %query, "Sending search request");

        let response = self
            .client
            .post(&url)
            .json(&self.request_body(query))
            .send()
            .await
            .map_err(|e| SearchError::Request {
                message: e.to_string(),
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| SearchError::Request {
            message: format!("Failed to read response body: {}", e),
        })?;

        if !status.is_success() {
            warn!(status = %status, "Search request rejected");
            return Err(Self::map_http_error(status, &text));
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| SearchError::ResponseParse {
            message: format!("Invalid JSON: {}", e),
        })?;
        Ok(SearchResponse::from_value(&body))
    }
}
