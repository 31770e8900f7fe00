//! Static file serving confined to one root directory.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

/// Upper bound on reading one static file.
pub const STATIC_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// File served for `/` and the empty path.
pub const INDEX_FILE: &str = "index.html";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Why a request path could not be mapped to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaticLookupError {
    /// The path escapes the root directory.
    Forbidden,
    /// Nothing servable exists at the path.
    NotFound,
}

impl StaticLookupError {
    /// Matching HTTP status.
    #[must_use]
    pub fn status(self) -> StatusCode {
        match self {
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

/// Map a URL path to a regular file under `root`.
///
/// `root` should already be canonical. The path is percent-decoded and
/// resolved lexically first, so `..` above the root is rejected even when the
/// target does not exist; the existing target is then canonicalized so a
/// symlink cannot lead outside the root either.
///
/// # Errors
///
/// [`StaticLookupError::Forbidden`] for escapes, [`StaticLookupError::NotFound`]
/// for missing paths and anything that is not a regular file.
pub fn resolve_static_path(root: &Path, url_path: &str) -> Result<PathBuf, StaticLookupError> {
    let decoded = urlencoding::decode(url_path).map_err(|_| StaticLookupError::NotFound)?;
    let relative = decoded.trim_start_matches('/');
    let target = if relative.is_empty() { INDEX_FILE } else { relative };

    let mut resolved = root.to_path_buf();
    let mut depth = 0usize;
    for component in Path::new(target).components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return Err(StaticLookupError::Forbidden);
                }
                resolved.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => return Err(StaticLookupError::Forbidden),
        }
    }

    let real = std::fs::canonicalize(&resolved).map_err(|_| StaticLookupError::NotFound)?;
    if !real.starts_with(root) {
        return Err(StaticLookupError::Forbidden);
    }
    if !real.is_file() {
        return Err(StaticLookupError::NotFound);
    }
    Ok(real)
}

/// Content type derived from the file extension.
#[must_use]
pub fn content_type_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_CONTENT_TYPE)
        .to_string()
}

/// Serve `url_path` from `root` as a complete HTTP response.
pub async fn serve_static(root: &Path, url_path: &str) -> Response {
    let path = match resolve_static_path(root, url_path) {
        Ok(path) => path,
        Err(e) => {
            tracing::debug!(path = url_path, status = %e.status(), "static lookup refused");
            return e.status().into_response();
        }
    };

    let bytes = match tokio::time::timeout(STATIC_READ_TIMEOUT, tokio::fs::read(&path)).await {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read static file");
            return StatusCode::NOT_FOUND.into_response();
        }
        Err(_) => {
            tracing::warn!(path = %path.display(), "static file read timed out");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type_for(&path)),
            (header::CONTENT_LENGTH, bytes.len().to_string()),
        ],
        bytes,
    )
        .into_response()
}
