//! HTTP front door: the generation endpoint, health check and static files.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::error::ImageError;
use crate::ports::{ImageGenerator, ImageRequest};
use crate::static_files::serve_static;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    generator: Arc<dyn ImageGenerator>,
    static_root: Arc<PathBuf>,
}

impl AppState {
    /// Bundle the generator with the static root.
    ///
    /// The root is canonicalized when it exists; otherwise every static
    /// request answers 404.
    pub fn new(generator: Arc<dyn ImageGenerator>, static_root: impl AsRef<Path>) -> Self {
        let root = static_root.as_ref();
        let root = std::fs::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        Self { generator, static_root: Arc::new(root) }
    }

    /// Canonical static root.
    #[must_use]
    pub fn static_root(&self) -> &Path {
        &self.static_root
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    image_data_url: String,
}

impl IntoResponse for ImageError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// Build the gateway router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate-image", post(generate_image).fallback(not_found))
        .route("/healthz", get(healthz).fallback(not_found))
        .fallback(fallback)
        .with_state(state)
}

/// Serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the listener fails.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), ImageError> {
    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutting down");
    }
}

async fn healthz() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn generate_image(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<GenerateResponse>, ImageError> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|_| ImageError::InvalidRequest("invalid JSON".into()))?;
    let sentence = payload.get("sentence").and_then(sentence_text).unwrap_or_default();
    let request = ImageRequest::new(&sentence)?;

    let generator = Arc::clone(&state.generator);
    let provider = generator.name();
    tracing::debug!(provider, chars = request.sentence().chars().count(), "generating image");

    // A separate task keeps the upstream call alive if the client goes away,
    // and turns an adapter panic into a JoinError.
    let outcome = tokio::spawn(async move { generator.generate(&request).await })
        .await
        .map_err(|e| ImageError::Internal(format!("image generation task failed: {e}")))?;

    match outcome {
        Ok(image) => Ok(Json(GenerateResponse { image_data_url: image.to_string() })),
        Err(e) => {
            tracing::warn!(
                provider,
                status = e.status_code(),
                error = %e,
                "image generation failed"
            );
            Err(e)
        }
    }
}

fn sentence_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" }))).into_response()
}

async fn fallback(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let path = uri.path();
    if path.starts_with("/api/") {
        return not_found().await;
    }
    if method == Method::GET || method == Method::HEAD {
        return serve_static(state.static_root(), path).await;
    }
    StatusCode::METHOD_NOT_ALLOWED.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentence_text_accepts_scalars() {
        assert_eq!(sentence_text(&json!("a cat")).as_deref(), Some("a cat"));
        assert_eq!(sentence_text(&json!(7)).as_deref(), Some("7"));
        assert_eq!(sentence_text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(sentence_text(&Value::Null), None);
        assert_eq!(sentence_text(&json!(["a"])), None);
    }

    #[test]
    fn error_response_status() {
        let response =
            ImageError::Api { status: 429, message: "rate limited".into() }.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let response = ImageError::InvalidRequest("sentence is required".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
