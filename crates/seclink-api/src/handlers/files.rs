//! Shareable file listing and uploads.

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use futures::StreamExt;

use seclink_core::error::AppError;

use crate::dto::response::{FileListResponse, UploadResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "binaryFile";

/// GET /api/v1/files
pub async fn list_files(State(state): State<AppState>) -> Result<Json<FileListResponse>, ApiError> {
    let files = state.files.list_files().await?;
    Ok(Json(FileListResponse {
        default_ttl: state.config.links.default_ttl.clone(),
        files,
    }))
}

/// POST /api/v1/files/upload
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid_input(format!("Multipart error: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::invalid_input("Uploaded file has no file name"))?;

        let stream = field.map(|chunk| chunk.map_err(std::io::Error::other));
        let size_bytes = state.files.save_upload(&filename, stream).await?;

        tracing::info!(filename = %filename, size_bytes, "File uploaded");
        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                filename,
                size_bytes,
            }),
        ));
    }

    Err(AppError::invalid_input(format!("Missing multipart field '{UPLOAD_FIELD}'")).into())
}
