//! Upstream provider abstractions and implementations.
//!
//! Handlers only see the traits, so Gemini and Giphy can be swapped for the
//! mocks in tests.

pub mod gemini;
pub mod giphy;
pub mod mock;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Short label used as the `outcome` metric dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::NotConfigured(_) => "not_configured",
            ProviderError::ApiError(_) => "api_error",
            ProviderError::RateLimited => "rate_limited",
            ProviderError::NetworkError(_) => "network_error",
        }
    }
}

/// Result of a text generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderResponse {
    /// First text part of the first candidate, if any.
    pub text: Option<String>,

    /// Input tokens consumed.
    pub input_tokens: i32,

    /// Output tokens generated.
    pub output_tokens: i32,

    /// Finish reason.
    pub finish_reason: FinishReason,
}

/// Reason why generation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Complete,
    Length,
    ContentFilter,
    Other,
}

impl FinishReason {
    pub fn from_api(reason: Option<&str>) -> Self {
        match reason {
            None | Some("STOP") => FinishReason::Complete,
            Some("MAX_TOKENS") => FinishReason::Length,
            Some("SAFETY") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => {
                FinishReason::ContentFilter
            }
            Some(_) => FinishReason::Other,
        }
    }
}

/// One GIF search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GifSearch {
    pub query: String,
    pub offset: u32,
    pub limit: u32,
    pub sort: &'static str,
    /// Giphy media type; selects the `/{type}/search` endpoint.
    pub media_type: &'static str,
    pub rating: &'static str,
}

impl GifSearch {
    /// A page of four family-friendly GIFs ordered by relevance.
    pub fn meme_page(query: impl Into<String>, offset: u32) -> Self {
        Self {
            query: query.into(),
            offset,
            limit: 4,
            sort: "relevant",
            media_type: "gifs",
            rating: "g",
        }
    }
}

/// Trait for single-turn text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Send `prompt` as one user message and return the reply.
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError>;
}

/// Trait for GIF search providers (e.g., Giphy).
#[async_trait]
pub trait GifProvider: Send + Sync {
    /// Run one search and return the provider's records untouched.
    async fn search(&self, search: &GifSearch) -> Result<Vec<Value>, ProviderError>;
}
