use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeFile;

use super::{ApiError, AppState};

/// GET /uploads/{*path}
/// Read-only serving of placed files. `ServeFile` picks the content type
/// from the extension and honors Range requests, which is what makes video
/// playback seekable; we add the cache header on top.
pub async fn serve_upload(
    State(state): State<Arc<AppState>>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    // Stored paths only ever contain plain segments; anything else is not a file we serve.
    if path
        .split('/')
        .any(|seg| seg.is_empty() || seg == "." || seg == "..")
    {
        return Err(ApiError::NotFound("File not found".to_string()));
    }

    let root = PathBuf::from(&state.config().storage.upload_root);
    let full = root.join(&path);
    if !full.is_file() {
        return Err(ApiError::NotFound("File not found".to_string()));
    }

    let mut builder = axum::http::Request::builder();
    if let Some(range) = headers.get(header::RANGE) {
        builder = builder.header(header::RANGE, range.clone());
    }
    let req = builder
        .body(Body::empty())
        .map_err(|e| ApiError::internal(format!("Failed to build request: {e}")))?;

    let mut response = match ServeFile::new(&full).try_call(req).await {
        Ok(res) => res.into_response(),
        Err(e) => return Err(ApiError::internal(format!("Failed to serve file: {e}"))),
    };

    let max_age = state.config().storage.cache_max_age_seconds;
    if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={max_age}")) {
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }

    Ok(response)
}
