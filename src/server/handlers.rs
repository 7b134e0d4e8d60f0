//! Request handlers.
//!
//! Every failure leaves as a JSON `{"error": message}` body with the status
//! from [`AniranError::status_code`].

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::error;

use super::AppState;
use crate::providers::ProxiedJson;
use crate::providers::image::IMAGE_CACHE_CONTROL;
use crate::types::DetailsResponse;
use crate::{AniranError, PKG_VERSION};

impl IntoResponse for AniranError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        }

        let message = match self {
            AniranError::Upstream { message, .. } | AniranError::Configuration(message) => message,
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<QueryRejection> for AniranError {
    fn from(rejection: QueryRejection) -> Self {
        AniranError::BadRequest(rejection.body_text())
    }
}

impl From<BytesRejection> for AniranError {
    fn from(rejection: BytesRejection) -> Self {
        AniranError::BadRequest(rejection.body_text())
    }
}

#[derive(Debug, Deserialize)]
pub struct DetailsQuery {
    pub id: Option<String>,
    pub refresh: Option<String>,
}

/// `GET /get-anime-details?id=<id>&refresh=true`
pub async fn anime_details(
    State(state): State<AppState>,
    query: Result<Query<DetailsQuery>, QueryRejection>,
) -> Result<Json<DetailsResponse>, AniranError> {
    let Query(query) = query?;
    let id = query.id.unwrap_or_default();
    let force_refresh = query.refresh.as_deref() == Some("true");
    let response = state.details.details(&id, force_refresh).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize)]
pub struct ImageQuery {
    pub url: Option<String>,
}

/// `GET /image-proxy?url=<absoluteUrl>`
pub async fn image_proxy(
    State(state): State<AppState>,
    query: Result<Query<ImageQuery>, QueryRejection>,
) -> Result<Response, AniranError> {
    let Query(query) = query?;
    let image = state
        .images
        .fetch(query.url.as_deref().unwrap_or_default())
        .await?;
    let status = StatusCode::from_u16(image.status).unwrap_or(StatusCode::BAD_GATEWAY);

    if !image.is_success() {
        return Ok((status, image.bytes).into_response());
    }

    let content_type = image
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());
    Ok((
        status,
        [
            (CONTENT_TYPE, content_type),
            (CACHE_CONTROL, IMAGE_CACHE_CONTROL.to_string()),
        ],
        image.bytes,
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct EndpointQuery {
    pub endpoint: Option<String>,
}

/// `GET /jikan-proxy?endpoint=<relativePath>`
pub async fn jikan_proxy(
    State(state): State<AppState>,
    query: Result<Query<EndpointQuery>, QueryRejection>,
) -> Result<Response, AniranError> {
    let Query(query) = query?;
    let proxied = state
        .jikan
        .proxy(query.endpoint.as_deref().unwrap_or_default())
        .await?;
    Ok(relay(proxied))
}

/// `POST /gemini-proxy` with a `generateContent` request body.
///
/// The key is checked before the body is parsed.
pub async fn gemini_proxy(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AniranError> {
    state.gemini.require_key()?;
    let body: Value = serde_json::from_slice(&body?)
        .map_err(|e| AniranError::BadRequest(format!("Invalid JSON body: {e}")))?;
    let proxied = state.gemini.generate_raw(&body).await?;
    Ok(relay(proxied))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": PKG_VERSION }))
}

fn relay(proxied: ProxiedJson) -> Response {
    let status = StatusCode::from_u16(proxied.status).unwrap_or(StatusCode::BAD_GATEWAY);
    (status, Json(proxied.body)).into_response()
}
