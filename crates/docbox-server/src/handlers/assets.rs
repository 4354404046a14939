//! Embedded asset endpoints.

use axum::http::header;
use axum::response::IntoResponse;
use docbox_shell::STYLESHEET;

/// Handle GET /assets/style.css.
pub(crate) async fn get_stylesheet() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        STYLESHEET,
    )
}
