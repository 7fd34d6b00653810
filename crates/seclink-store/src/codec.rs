//! On-disk encoding of entry records.

use seclink_core::error::{AppError, ErrorKind};
use seclink_core::result::AppResult;
use seclink_core::types::EntryRecord;

/// Serialize a record as JSON bytes.
#[cfg_attr(not(feature = "sled-backend"), allow(dead_code))]
pub(crate) fn encode(record: &EntryRecord) -> AppResult<Vec<u8>> {
    serde_json::to_vec(record)
        .map_err(|e| AppError::with_source(ErrorKind::StoreFailure, "Failed to encode entry", e))
}

/// Deserialize a record, reporting undecodable bytes as store corruption.
#[cfg_attr(not(feature = "sled-backend"), allow(dead_code))]
pub(crate) fn decode(raw: &[u8]) -> AppResult<EntryRecord> {
    serde_json::from_slice(raw)
        .map_err(|e| AppError::with_source(ErrorKind::StoreFailure, "Corrupt link entry", e))
}
