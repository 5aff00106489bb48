//! HTTP service
//!
//! Exposes the renders as `GET /api/{avatar,cube,body,bust,skin}` plus a
//! health check. Each request runs the full lookup chain; nothing is cached
//! in-process; the cache headers leave that to clients and CDNs.

pub mod handlers;

use axum::http::header::InvalidHeaderValue;
use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::{ConfigError, SkinrenderConfig};
use crate::render::{RenderSize, SizeError};
use crate::renderer::SkinRenderer;

/// Errors that stop the service from starting.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid header value in [server] config: {0}")]
    Header(#[from] InvalidHeaderValue),
    #[error("invalid render.default_size: {0}")]
    DefaultSize(#[from] SizeError),
    #[error("failed to set up renderer: {0}")]
    Renderer(#[from] crate::Error),
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, source: std::io::Error },
    #[error("server failed: {0}")]
    Serve(std::io::Error),
}

/// Shared per-process state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub renderer: SkinRenderer,
    pub default_size: RenderSize,
    pub cache_control: HeaderValue,
    pub cdn_cache_control: HeaderValue,
}

impl AppState {
    pub fn new(renderer: SkinRenderer, config: &SkinrenderConfig) -> Result<Self, ServerError> {
        Ok(Self {
            renderer,
            default_size: RenderSize::new(config.render.default_size)?,
            cache_control: HeaderValue::from_str(&config.server.cache_control)?,
            cdn_cache_control: HeaderValue::from_str(&config.server.cdn_cache_control)?,
        })
    }

    /// State with an HTTP profile client built from `config`.
    pub fn from_config(config: &SkinrenderConfig) -> Result<Self, ServerError> {
        Self::new(SkinRenderer::new(&config.api)?, config)
    }
}

/// Router with every endpoint and request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/api/avatar", get(handlers::avatar))
        .route("/api/cube", get(handlers::cube))
        .route("/api/body", get(handlers::body))
        .route("/api/bust", get(handlers::bust))
        .route("/api/skin", get(handlers::skin))
        .route("/healthz", get(handlers::healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve on an already bound listener until `shutdown` resolves.
pub async fn serve_with_shutdown(
    listener: TcpListener,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError> {
    axum::serve(listener, app(state)).with_graceful_shutdown(shutdown).await.map_err(ServerError::Serve)
}

/// Bind `server.bind` and serve until Ctrl-C.
pub async fn run(config: SkinrenderConfig) -> Result<(), ServerError> {
    let state = AppState::from_config(&config)?;
    let addr = config.server.bind.clone();
    let listener = TcpListener::bind(&addr).await.map_err(|source| ServerError::Bind { addr: addr.clone(), source })?;

    tracing::info!(%addr, "skinrender listening");
    serve_with_shutdown(listener, state, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
