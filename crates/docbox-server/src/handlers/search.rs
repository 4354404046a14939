//! Search index endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use docbox_site::SearchIndex;

use crate::state::AppState;

/// Handle GET /search-index.json.
pub(crate) async fn get_search_index(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let index: SearchIndex = state.site.search_index(&state.search);

    (
        [(header::CACHE_CONTROL, "private, max-age=60")],
        Json(index),
    )
}
