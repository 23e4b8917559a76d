//! Mock provider implementations for testing.

use super::{
    FinishReason, GifProvider, GifSearch, ProviderError, ProviderResponse, TextProvider,
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

/// Mock text provider that replays a canned reply and records prompts.
pub struct MockTextProvider {
    reply: Result<Option<String>, String>,
    prompts: Mutex<Vec<String>>,
}

impl MockTextProvider {
    /// Reply with `text` as the first candidate's first part.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_reply(Ok(Some(text.into())))
    }

    /// Reply with a response that carries no text part.
    pub fn without_text() -> Self {
        Self::with_reply(Ok(None))
    }

    /// Fail every call with an API error carrying `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_reply(Err(message.into()))
    }

    fn with_reply(reply: Result<Option<String>, String>) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(&self, prompt: &str) -> Result<ProviderResponse, ProviderError> {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match &self.reply {
            Ok(text) => Ok(ProviderResponse {
                text: text.clone(),
                input_tokens: prompt.len() as i32 / 4,
                output_tokens: 10,
                finish_reason: FinishReason::Complete,
            }),
            Err(message) => Err(ProviderError::ApiError(message.clone())),
        }
    }
}

/// Mock GIF provider that returns fixed records and records searches.
pub struct MockGifProvider {
    results: Result<Vec<Value>, String>,
    searches: Mutex<Vec<GifSearch>>,
}

impl MockGifProvider {
    pub fn returning(records: Vec<Value>) -> Self {
        Self {
            results: Ok(records),
            searches: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            results: Err(message.into()),
            searches: Mutex::new(Vec::new()),
        }
    }

    /// Searches received so far, oldest first.
    pub fn searches(&self) -> Vec<GifSearch> {
        self.searches
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl GifProvider for MockGifProvider {
    async fn search(&self, search: &GifSearch) -> Result<Vec<Value>, ProviderError> {
        if let Ok(mut searches) = self.searches.lock() {
            searches.push(search.clone());
        }

        match &self.results {
            Ok(records) => Ok(records.clone()),
            Err(message) => Err(ProviderError::NetworkError(message.clone())),
        }
    }
}
