//! Request handlers

use axum::extract::{Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::error::{Error, ParameterError};
use crate::output::file_stem_for;
use crate::render::{RenderKind, RenderSize};

/// Body text for any rejected size.
pub const SIZE_MESSAGE: &str = "Size must be between 8 and 512";

static CDN_CACHE_CONTROL: HeaderName = HeaderName::from_static("cdn-cache-control");

/// Query string accepted by every image endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct RenderQuery {
    pub username: Option<String>,
    pub size: Option<String>,
}

/// [`Error`] rendered as a JSON `{"error": ...}` response.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<ParameterError> for ApiError {
    fn from(err: ParameterError) -> Self {
        Self(err.into())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Error::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            Error::SkinNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> String {
        match &self.0 {
            Error::InvalidParameter(ParameterError::Size(_)) => SIZE_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::debug!(error = %self.0, %status, "request rejected");
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

/// Trimmed, non-empty username from the query.
fn require_username(query: &RenderQuery) -> Result<&str, ParameterError> {
    query.username.as_deref().map(str::trim).filter(|name| !name.is_empty()).ok_or(ParameterError::MissingIdentifier)
}

fn requested_size(query: &RenderQuery, default: RenderSize) -> Result<RenderSize, ParameterError> {
    match query.size.as_deref() {
        Some(raw) => Ok(raw.parse()?),
        None => Ok(default),
    }
}

fn png_headers(state: &AppState) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("image/png"));
    headers.insert(CACHE_CONTROL, state.cache_control.clone());
    headers.insert(CDN_CACHE_CONTROL.clone(), state.cdn_cache_control.clone());
    headers
}

async fn render_kind(state: AppState, query: RenderQuery, kind: RenderKind) -> Result<Response, ApiError> {
    let username = require_username(&query)?;
    let size = requested_size(&query, state.default_size)?;

    let png = state.renderer.render(kind, username, size).await?;
    Ok((StatusCode::OK, png_headers(&state), png).into_response())
}

pub async fn avatar(State(state): State<AppState>, Query(query): Query<RenderQuery>) -> Result<Response, ApiError> {
    render_kind(state, query, RenderKind::Avatar).await
}

pub async fn cube(State(state): State<AppState>, Query(query): Query<RenderQuery>) -> Result<Response, ApiError> {
    render_kind(state, query, RenderKind::Cube).await
}

pub async fn body(State(state): State<AppState>, Query(query): Query<RenderQuery>) -> Result<Response, ApiError> {
    render_kind(state, query, RenderKind::Body).await
}

pub async fn bust(State(state): State<AppState>, Query(query): Query<RenderQuery>) -> Result<Response, ApiError> {
    render_kind(state, query, RenderKind::Bust).await
}

/// `GET /api/skin`: the raw texture, served inline under the player's name.
pub async fn skin(State(state): State<AppState>, Query(query): Query<RenderQuery>) -> Result<Response, ApiError> {
    let username = require_username(&query)?;
    let texture = state.renderer.fetch_skin(username).await?;

    let mut headers = png_headers(&state);
    let disposition = format!("inline; filename=\"{}.png\"", file_stem_for(username));
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(CONTENT_DISPOSITION, value);
    }
    Ok((StatusCode::OK, headers, texture).into_response())
}

pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
