//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::handlers;
use crate::middleware::security;
use crate::state::AppState;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route("/assets/style.css", get(handlers::assets::get_stylesheet))
        .route("/search-index.json", get(handlers::search::get_search_index))
        .route("/", get(handlers::pages::get_root_page))
        .route("/{*path}", get(handlers::pages::get_page))
        .with_state(state);

    security::apply(router)
}
