//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body of `POST /api/v1/links/share`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ShareLinkRequest {
    /// File path relative to the files root.
    #[validate(length(min = 1, max = 4096, message = "path is required"))]
    pub path: String,
    /// Lifetime such as `"30m"` or `"2d"`; the configured default when absent.
    #[validate(length(min = 1, max = 64))]
    pub ttl: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation() {
        let ok: ShareLinkRequest =
            serde_json::from_str(r#"{"path":"a.txt","ttl":"1h"}"#).unwrap();
        assert!(ok.validate().is_ok());

        let no_ttl: ShareLinkRequest = serde_json::from_str(r#"{"path":"a.txt"}"#).unwrap();
        assert!(no_ttl.validate().is_ok());
        assert!(no_ttl.ttl.is_none());

        let empty: ShareLinkRequest = serde_json::from_str(r#"{"path":""}"#).unwrap();
        assert!(empty.validate().is_err());
    }
}
