//! Serves the browser frontend, when one is configured

use crate::api::error::{ApiError, ApiResult};
use crate::api::handlers::StatusResponse;
use crate::api::{json_response, AppState};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use mime::Mime;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

const INDEX_FILE: &str = "index.html";

/// `GET /`: the frontend's `index.html`, or the status document
pub async fn index(state: &AppState) -> ApiResult<Response<Full<Bytes>>> {
    if let Some(dir) = state.frontend_dir() {
        match read_file(&dir.join(INDEX_FILE)).await {
            Ok(response) => return Ok(response),
            Err(ApiError::NotFound(_)) => {
                debug!("No {} in {:?}, serving status", INDEX_FILE, dir);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(json_response(StatusCode::OK, &StatusResponse::ok()))
}

/// `GET /<asset>`: a file below the frontend directory
pub async fn asset(state: &AppState, request_path: &str) -> ApiResult<Response<Full<Bytes>>> {
    let dir = state
        .frontend_dir()
        .ok_or_else(|| ApiError::NotFound(request_path.to_string()))?;
    let relative =
        safe_relative_path(request_path).ok_or_else(|| ApiError::NotFound(request_path.to_string()))?;

    read_file(&dir.join(relative)).await
}

/// Map a URL path onto a relative file path
///
/// Rejects empty segments and segments starting with a dot, which rules
/// out `..` traversal and hidden files.
pub fn safe_relative_path(request_path: &str) -> Option<PathBuf> {
    let trimmed = request_path.strip_prefix('/')?;
    if trimmed.is_empty() {
        return None;
    }

    let mut path = PathBuf::new();
    for segment in trimmed.split('/') {
        let valid = !segment.is_empty()
            && !segment.starts_with('.')
            && segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return None;
        }
        path.push(segment);
    }
    Some(path)
}

/// Content type for a file, by extension
pub fn content_type(path: &Path) -> Mime {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("html") | Some("htm") => mime::TEXT_HTML_UTF_8,
        Some("js") => mime::APPLICATION_JAVASCRIPT_UTF_8,
        Some("css") => mime::TEXT_CSS_UTF_8,
        Some("json") => mime::APPLICATION_JSON,
        Some("svg") => mime::IMAGE_SVG,
        Some("png") => mime::IMAGE_PNG,
        Some("jpg") | Some("jpeg") => mime::IMAGE_JPEG,
        Some("txt") => mime::TEXT_PLAIN_UTF_8,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

async fn read_file(path: &Path) -> ApiResult<Response<Full<Bytes>>> {
    let data = tokio::fs::read(path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => {
            ApiError::NotFound(path.display().to_string())
        }
        _ => ApiError::Internal(format!("failed to read {}: {}", path.display(), e)),
    })?;

    let mut response = Response::new(Full::new(Bytes::from(data)));
    let mime = content_type(path);
    if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
        response.headers_mut().insert(CONTENT_TYPE, value);
    }
    Ok(response)
}
