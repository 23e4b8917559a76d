//! Gemini and Giphy clients against mock HTTP servers.

use babel_service::services::metrics::{get_metrics, init_metrics};
use babel_service::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use babel_service::services::providers::giphy::{GiphyClient, GiphyConfig};
use babel_service::services::providers::{FinishReason, ProviderError};
use babel_service::services::{GifProvider, GifSearch, TextProvider};
use secrecy::Secret;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn gemini(server: &MockServer) -> GeminiTextProvider {
    GeminiTextProvider::new(GeminiConfig {
        api_key: Secret::new("gemini-test-key".to_string()),
        model: "gemini-2.5-flash".to_string(),
        api_base: format!("{}/v1beta", server.uri()),
        timeout: Duration::from_secs(5),
    })
    .expect("Failed to build Gemini client")
}

fn giphy(server: &MockServer) -> GiphyClient {
    GiphyClient::new(GiphyConfig {
        api_key: Secret::new("giphy-test-key".to_string()),
        api_base: format!("{}/v1", server.uri()),
        timeout: Duration::from_secs(5),
    })
    .expect("Failed to build Giphy client")
}

// ============================================================================
// Gemini
// ============================================================================

#[tokio::test]
async fn gemini_sends_single_user_turn() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "gemini-test-key"))
        .and(body_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "translate me" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "{\"translation\":\"hola\"}" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 7, "candidatesTokenCount": 4 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = gemini(&server).generate("translate me").await.unwrap();

    assert_eq!(response.text.as_deref(), Some("{\"translation\":\"hola\"}"));
    assert_eq!(response.input_tokens, 7);
    assert_eq!(response.output_tokens, 4);
    assert_eq!(response.finish_reason, FinishReason::Complete);
}

#[tokio::test]
async fn gemini_token_usage_is_counted() {
    init_metrics().expect("Failed to install metrics recorder");
    let server = MockServer::start().await;
    let model = "gemini-token-count";

    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{}:generateContent", model)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{}" }] },
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 9, "candidatesTokenCount": 2 }
        })))
        .mount(&server)
        .await;

    let provider = GeminiTextProvider::new(GeminiConfig {
        api_key: Secret::new("gemini-test-key".to_string()),
        model: model.to_string(),
        api_base: format!("{}/v1beta", server.uri()),
        timeout: Duration::from_secs(5),
    })
    .unwrap();
    provider.generate("count me").await.unwrap();

    let rendered = get_metrics();
    let count_for = |direction: &str| {
        rendered
            .lines()
            .find(|line| {
                line.starts_with("gemini_tokens_total")
                    && line.contains(model)
                    && line.contains(&format!("direction=\"{}\"", direction))
            })
            .and_then(|line| line.rsplit(' ').next())
            .map(str::to_string)
    };

    assert_eq!(count_for("input").as_deref(), Some("9"));
    assert_eq!(count_for("output").as_deref(), Some("2"));
}

#[tokio::test]
async fn gemini_without_candidates_has_no_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let response = gemini(&server).generate("anything").await.unwrap();
    assert_eq!(response.text, None);
}

#[tokio::test]
async fn gemini_rate_limit_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = gemini(&server).generate("anything").await.unwrap_err();
    assert!(matches!(err, ProviderError::RateLimited));
}

#[tokio::test]
async fn gemini_api_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(
            ResponseTemplate::new(400).set_body_string("API key not valid"),
        )
        .mount(&server)
        .await;

    let err = gemini(&server).generate("anything").await.unwrap_err();
    match err {
        ProviderError::ApiError(msg) => {
            assert!(msg.contains("400"));
            assert!(msg.contains("API key not valid"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

// ============================================================================
// Giphy
// ============================================================================

#[tokio::test]
async fn giphy_search_sends_fixed_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/gifs/search"))
        .and(query_param("api_key", "giphy-test-key"))
        .and(query_param("q", "dance"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "4"))
        .and(query_param("sort", "relevant"))
        .and(query_param("rating", "g"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "1" }, { "id": "2" }],
            "pagination": { "total_count": 2, "count": 2, "offset": 0 },
            "meta": { "status": 200, "msg": "OK" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let records = giphy(&server)
        .search(&GifSearch::meme_page("dance", 0))
        .await
        .unwrap();

    assert_eq!(records, vec![json!({ "id": "1" }), json!({ "id": "2" })]);
}

#[tokio::test]
async fn giphy_records_are_untouched() {
    let server = MockServer::start().await;
    let record = json!({
        "type": "gif",
        "id": "xT9IgG50Fb7Mi0prBC",
        "images": { "fixed_height": { "url": "https://media.giphy.com/x.gif", "width": "200" } },
        "user": null
    });

    Mock::given(method("GET"))
        .and(path("/v1/gifs/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [record.clone()] })))
        .mount(&server)
        .await;

    let records = giphy(&server)
        .search(&GifSearch::meme_page("cat", 0))
        .await
        .unwrap();

    assert_eq!(records, vec![record]);
}

#[tokio::test]
async fn giphy_error_status_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/gifs/search"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" })))
        .mount(&server)
        .await;

    let err = giphy(&server)
        .search(&GifSearch::meme_page("cat", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::ApiError(_)));
}

#[tokio::test]
async fn unreachable_giphy_is_a_network_error() {
    let client = GiphyClient::new(GiphyConfig {
        api_key: Secret::new("giphy-test-key".to_string()),
        api_base: "http://127.0.0.1:1/v1".to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap();

    let err = client
        .search(&GifSearch::meme_page("cat", 0))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::NetworkError(_)));
    assert!(!err.to_string().contains("giphy-test-key"));
}
