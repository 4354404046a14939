//! Page endpoints.
//!
//! Resolves the requested path, renders the content through the wrapper, and
//! composes the full HTML document with the shell. Conditional requests are
//! answered with 304 via ETag comparison.

use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use chrono::{DateTime, Utc};
use docbox_site::ResolveError;
use md5::{Digest, Md5};

use crate::error::ServerError;
use crate::state::AppState;

/// Handle GET / (root page).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_page_impl(String::new(), &state, &headers)
}

/// Handle GET /{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_page_impl(path, &state, &headers)
}

/// Shared implementation for page rendering.
fn get_page_impl(
    path: String,
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let unit = match state.site.resolve(&path) {
        Ok(unit) => unit,
        Err(ResolveError::NotFound(_)) => {
            tracing::debug!(path = %path, "Page not found");
            return Ok((StatusCode::NOT_FOUND, Html(state.shell.not_found(&path))).into_response());
        }
        Err(ResolveError::Io(e)) => {
            return Err(ServerError::Internal(e.to_string()));
        }
    };

    let body = state.page_renderer.render(&unit);
    let document = state.shell.compose(
        &unit.exports.title,
        unit.metadata.description.as_deref(),
        &body,
    );

    let etag = compute_etag(&state.version, &document);

    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let source_mtime = UNIX_EPOCH + Duration::from_secs_f64(unit.source_mtime);
    let last_modified: DateTime<Utc> = source_mtime.into();

    Ok((
        [
            (header::ETAG, etag),
            (
                header::LAST_MODIFIED,
                last_modified
                    .format("%a, %d %b %Y %H:%M:%S GMT")
                    .to_string(),
            ),
            (header::CACHE_CONTROL, "private, max-age=60".to_owned()),
        ],
        Html(document),
    )
        .into_response())
}

/// Compute `ETag` from version and content.
///
/// Uses MD5 hash truncated to 64 bits (16 hex chars), sufficient for cache
/// invalidation with negligible collision probability.
fn compute_etag(version: &str, content: &str) -> String {
    let hash = Md5::digest(format!("{version}:{content}").as_bytes());
    format!("\"{}\"", &hex::encode(hash)[..16])
}
