//! Application startup and lifecycle management.
//!
//! Builds the provider clients from configuration, wires them into the
//! router and runs the HTTP server until a shutdown signal arrives.

use crate::config::BabelConfig;
use crate::handlers::{health, memes, translate};
use crate::services::providers::gemini::{GeminiConfig, GeminiTextProvider};
use crate::services::providers::giphy::{GiphyClient, GiphyConfig};
use crate::services::{GifProvider, ProviderError, TextProvider};
use axum::middleware::from_fn;
use axum::{
    routing::{get, post},
    Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    tracing::{request_id_middleware, trace_layer},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub text_provider: Arc<dyn TextProvider>,
    pub gif_provider: Arc<dyn GifProvider>,
}

impl AppState {
    pub fn new(text_provider: Arc<dyn TextProvider>, gif_provider: Arc<dyn GifProvider>) -> Self {
        Self {
            text_provider,
            gif_provider,
        }
    }

    /// Build the Gemini and Giphy clients described by `config`.
    pub fn from_config(config: &BabelConfig) -> Result<Self, ProviderError> {
        let timeout = Duration::from_secs(config.upstream.timeout_secs);

        if config.gemini.api_key.expose_secret().is_empty() {
            tracing::warn!("GEMINI_API_KEY not set - translation requests will fail");
        }
        if config.giphy.api_key.expose_secret().is_empty() {
            tracing::warn!("GIPHY_API_KEY not set - meme searches will fail");
        }

        let gemini = GeminiTextProvider::new(GeminiConfig {
            api_key: config.gemini.api_key.clone(),
            model: config.gemini.model.clone(),
            api_base: config.gemini.api_base.clone(),
            timeout,
        })?;
        tracing::info!(model = %gemini.model(), "Initialized Gemini text provider");

        let giphy = GiphyClient::new(GiphyConfig {
            api_key: config.giphy.api_key.clone(),
            api_base: config.giphy.api_base.clone(),
            timeout,
        })?;
        tracing::info!(endpoint = %config.giphy.api_base, "Initialized Giphy client");

        Ok(Self::new(Arc::new(gemini), Arc::new(giphy)))
    }
}

/// Routes, middleware and permissive CORS over `state`.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::index))
        .route("/health", get(health::health_check))
        .route("/metrics", get(health::metrics))
        .route("/api/translate", post(translate::translate))
        .route("/api/memes", post(memes::search_memes))
        .layer(from_fn(metrics_middleware))
        .layer(trace_layer())
        .layer(from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: BabelConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config).map_err(|e| {
            tracing::error!("Failed to initialize providers: {}", e);
            AppError::ConfigError(anyhow::Error::new(e))
        })?;

        Self::with_state(config.common.port, state).await
    }

    /// Bind `port` (0 picks a random port) and serve `state`.
    pub async fn with_state(port: u16, state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        Ok(Self {
            port,
            listener,
            router: build_router(state),
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until a shutdown signal is received.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        tracing::info!("babel-service listening on port {}", self.port);

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
