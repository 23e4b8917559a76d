#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
    Router,
};
use babel_service::services::providers::mock::{MockGifProvider, MockTextProvider};
use babel_service::startup::build_router;
use babel_service::AppState;
use std::sync::Arc;
use tower::util::ServiceExt;

/// Router over mock providers; the mocks are returned for inspection.
pub fn app_with(
    text: MockTextProvider,
    gifs: MockGifProvider,
) -> (Router, Arc<MockTextProvider>, Arc<MockGifProvider>) {
    let text = Arc::new(text);
    let gifs = Arc::new(gifs);
    let router = build_router(AppState::new(text.clone(), gifs.clone()));
    (router, text, gifs)
}

pub async fn send(router: Router, request: Request<Body>) -> Response {
    router.oneshot(request).await.expect("router is infallible")
}

pub async fn post_json(router: Router, path: &str, body: &str) -> (StatusCode, serde_json::Value) {
    let response = send(
        router,
        Request::builder()
            .method("POST")
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await;

    let status = response.status();
    (status, body_json(response).await)
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body")
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).expect("Failed to parse JSON")
}
