//! Link creation and listing for administrators.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use validator::Validate;

use seclink_core::error::AppError;
use seclink_service::{CreatedLink, LinkSummary};

use crate::dto::request::ShareLinkRequest;
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/v1/links/share
pub async fn create_link(
    State(state): State<AppState>,
    Json(req): Json<ShareLinkRequest>,
) -> Result<(StatusCode, Json<CreatedLink>), ApiError> {
    req.validate()
        .map_err(|e| AppError::invalid_input(format!("Invalid request: {e}")))?;

    let ttl = state.links.request_ttl(req.ttl.as_deref())?;
    let link = state.links.create_link(&req.path, ttl).await?;

    Ok((StatusCode::CREATED, Json(link)))
}

/// GET /api/v1/links
pub async fn list_links(State(state): State<AppState>) -> Result<Json<Vec<LinkSummary>>, ApiError> {
    let links = state.links.list_links().await?;
    Ok(Json(links))
}
