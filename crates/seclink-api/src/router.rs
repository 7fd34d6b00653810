//! Route definitions for the Seclink HTTP servers.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Router for the public listener: link redemption only.
pub fn public_router(state: AppState) -> Router {
    Router::new()
        .route("/links/{id}", get(handlers::links::redeem_link))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Router for the admin listener.
///
/// Uploads may be as large as `server.max_upload_bytes`; every other route
/// keeps axum's default body limit.
pub fn admin_router(state: AppState) -> Router {
    let max_upload = state.config.server.max_upload_bytes;

    let api_routes = Router::new()
        .route("/links", get(handlers::share::list_links))
        .route("/links/share", post(handlers::share::create_link))
        .route("/files", get(handlers::files::list_files))
        .route(
            "/files/upload",
            post(handlers::files::upload_file).layer(DefaultBodyLimit::max(max_upload)),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/health", get(handlers::health::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
