//! `POST /api/memes`: one page of GIFs for a search term.

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use service_core::error::AppError;
use thiserror::Error;

use crate::services::body::text_field;
use crate::services::{GifProvider, GifSearch, ProviderError};
use crate::AppState;

/// Query used when the request names none.
pub const DEFAULT_QUERY: &str = "funny cat";

#[derive(Debug, Error)]
pub enum MemeError {
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Body of `POST /api/memes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemeRequest {
    pub q: Option<String>,
}

impl MemeRequest {
    /// Parse any JSON body. A falsy or missing `q` (and any non-object body)
    /// falls back to the default query; other scalars are used as text.
    pub fn from_body(body: &[u8]) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_slice(body)?;
        Ok(Self {
            q: text_field(&value, "q"),
        })
    }

    pub fn query(&self) -> &str {
        self.q.as_deref().unwrap_or(DEFAULT_QUERY)
    }
}

pub async fn search_memes(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Vec<Value>>, AppError> {
    run_search(state.gif_provider.as_ref(), &body)
        .await
        .map(Json)
        .map_err(|err| {
            tracing::error!(error = %err, "Meme search failed");
            AppError::Upstream(err.to_string())
        })
}

async fn run_search(provider: &dyn GifProvider, body: &[u8]) -> Result<Vec<Value>, MemeError> {
    let request = MemeRequest::from_body(body)?;
    let search = GifSearch::meme_page(request.query(), 0);
    Ok(provider.search(&search).await?)
}
