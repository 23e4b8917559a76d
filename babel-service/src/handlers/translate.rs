//! `POST /api/translate`: ask the model for a translation and relay its JSON.

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use service_core::error::{AppError, ErrorBody};
use thiserror::Error;

use crate::services::translation::{
    build_prompt, ParsedReply, TranslationRequest, MISSING_FIELDS_MESSAGE,
};
use crate::services::{ProviderError, TextProvider};
use crate::AppState;

#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("{}", MISSING_FIELDS_MESSAGE)]
    MissingFields,

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    #[serde(rename = "AiResponse")]
    pub ai_response: Value,
}

pub async fn translate(State(state): State<AppState>, body: Bytes) -> Response {
    match run_translation(state.text_provider.as_ref(), &body).await {
        Ok(ai_response) => Json(TranslateResponse { ai_response }).into_response(),
        Err(TranslateError::MissingFields) => {
            AppError::BadRequest(anyhow::anyhow!(MISSING_FIELDS_MESSAGE)).into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "Translation request failed");
            // This route reports failures with a 200 status; clients check `error`.
            Json(ErrorBody::new(err.to_string())).into_response()
        }
    }
}

async fn run_translation(provider: &dyn TextProvider, body: &[u8]) -> Result<Value, TranslateError> {
    let request = TranslationRequest::from_body(body)?;
    let input = request.into_input().ok_or(TranslateError::MissingFields)?;

    let response = provider.generate(&build_prompt(&input)).await?;

    let reply = ParsedReply::from_model_text(response.text.as_deref());
    if reply.is_placeholder() {
        tracing::warn!(
            source_lang = %input.source_lang,
            target_lang = %input.target_lang,
            "Model reply was not valid JSON, returning placeholder"
        );
    } else if !reply.has_expected_shape() {
        tracing::warn!(
            source_lang = %input.source_lang,
            target_lang = %input.target_lang,
            "Model reply does not match the requested shape, forwarding as-is"
        );
    }

    Ok(reply.into_value())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockTextProvider;
    use serde_json::json;

    #[tokio::test]
    async fn unreadable_body_is_reported() {
        let provider = MockTextProvider::replying("{}");
        let err = run_translation(&provider, b"not json").await.unwrap_err();
        assert!(matches!(err, TranslateError::InvalidBody(_)));
        assert!(provider.prompts().is_empty());
    }

    #[tokio::test]
    async fn missing_fields_skip_the_provider() {
        let provider = MockTextProvider::replying("{}");
        let err = run_translation(&provider, br#"{"q":"hi","sl":"en"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::MissingFields));
        assert_eq!(err.to_string(), "q, sl, and dl are required");
        assert!(provider.prompts().is_empty());
    }

    #[tokio::test]
    async fn array_body_is_missing_fields() {
        let provider = MockTextProvider::replying("{}");
        let err = run_translation(&provider, br#"["hello","English","Hindi"]"#)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::MissingFields));
        assert!(provider.prompts().is_empty());
    }

    #[tokio::test]
    async fn numeric_text_is_translated() {
        let provider = MockTextProvider::replying("{}");
        run_translation(&provider, br#"{"q":42,"sl":"English","dl":"Hindi"}"#)
            .await
            .unwrap();

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Text: \"42\""));
    }

    #[tokio::test]
    async fn sends_one_prompt_and_returns_parsed_reply() {
        let provider = MockTextProvider::replying("```json\n{\"translation\":\"hola\"}\n```");
        let value = run_translation(&provider, br#"{"q":"hello","sl":"English","dl":"Spanish"}"#)
            .await
            .unwrap();

        assert_eq!(value, json!({ "translation": "hola" }));

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("from English to Spanish"));
        assert!(prompts[0].contains("Text: \"hello\""));
    }

    #[tokio::test]
    async fn provider_failure_is_propagated() {
        let provider = MockTextProvider::failing("quota exceeded");
        let err = run_translation(&provider, br#"{"q":"hi","sl":"en","dl":"fr"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::Provider(_)));
        assert!(err.to_string().contains("quota exceeded"));
    }
}
