//! Giphy search client.

use super::{GifProvider, GifSearch, ProviderError};
use crate::services::metrics::record_upstream;
use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct GiphyConfig {
    pub api_key: Secret<String>,
    pub api_base: String,
    pub timeout: Duration,
}

/// Giphy client for the `/{type}/search` endpoints.
#[derive(Clone)]
pub struct GiphyClient {
    client: Client,
    config: GiphyConfig,
}

/// Envelope of a Giphy search response. Only `data` is forwarded.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<Value>,
}

impl GiphyClient {
    pub fn new(config: GiphyConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn search_url(&self, media_type: &str) -> String {
        format!(
            "{}/{}/search",
            self.config.api_base.trim_end_matches('/'),
            media_type
        )
    }

    async fn call_search(&self, search: &GifSearch) -> Result<Vec<Value>, ProviderError> {
        let api_key = self.config.api_key.expose_secret();
        if api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "Giphy API key not configured".to_string(),
            ));
        }

        tracing::debug!(
            query = %search.query,
            offset = search.offset,
            limit = search.limit,
            "Searching Giphy"
        );

        let offset = search.offset.to_string();
        let limit = search.limit.to_string();

        let response = self
            .client
            .get(self.search_url(search.media_type))
            .query(&[
                ("api_key", api_key.as_str()),
                ("q", search.query.as_str()),
                ("offset", offset.as_str()),
                ("limit", limit.as_str()),
                ("sort", search.sort),
                ("rating", search.rating),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.without_url().to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "Giphy API error {}: {}",
                status, error_text
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        Ok(body.data)
    }
}

#[async_trait]
impl GifProvider for GiphyClient {
    async fn search(&self, search: &GifSearch) -> Result<Vec<Value>, ProviderError> {
        let started = Instant::now();
        let result = self.call_search(search).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        record_upstream("giphy", outcome, started.elapsed());

        result
    }
}
