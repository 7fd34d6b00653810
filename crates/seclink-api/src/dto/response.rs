//! Response DTOs.

use serde::{Deserialize, Serialize};

use seclink_storage::FileEntry;

/// Body of `GET /api/v1/files`.
#[derive(Debug, Clone, Serialize)]
pub struct FileListResponse {
    /// Lifetime applied when a share request omits one.
    pub default_ttl: String,
    /// Shareable files, sorted by path.
    pub files: Vec<FileEntry>,
}

/// Body of a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Name the file was saved under.
    pub filename: String,
    /// Bytes written.
    pub size_bytes: u64,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Store backend in use.
    pub store: String,
    /// Crate version.
    pub version: String,
}
