//! Link identifier generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;

use seclink_core::error::{AppError, ErrorKind};
use seclink_core::result::AppResult;

/// Source of new link identifiers.
pub trait IdGenerator: Send + Sync + std::fmt::Debug + 'static {
    /// Produce a fresh identifier.
    fn generate(&self) -> AppResult<String>;
}

/// Identifiers drawn from the operating system CSPRNG and encoded as
/// URL-safe base64 without padding.
///
/// Every character carries 6 bits, so the default 64-character id holds
/// 384 bits of entropy.
#[derive(Debug, Clone)]
pub struct SecureIdGenerator {
    /// Output length in characters.
    length: usize,
}

impl SecureIdGenerator {
    /// Create a generator producing ids of exactly `length` characters.
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// Configured output length.
    pub fn length(&self) -> usize {
        self.length
    }
}

impl IdGenerator for SecureIdGenerator {
    fn generate(&self) -> AppResult<String> {
        let mut bytes = vec![0u8; self.length.div_ceil(4) * 3];
        OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
            AppError::with_source(
                ErrorKind::EntropyUnavailable,
                "Operating system random source failed",
                e,
            )
        })?;

        let mut id = URL_SAFE_NO_PAD.encode(&bytes);
        id.truncate(self.length);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_length_and_alphabet() {
        for length in [16, 17, 63, 64, 100] {
            let id = SecureIdGenerator::new(length).generate().unwrap();
            assert_eq!(id.len(), length);
            assert!(
                id.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
                "unexpected character in {id}"
            );
        }
    }

    #[test]
    fn test_ids_do_not_repeat() {
        let generator = SecureIdGenerator::new(64);
        let ids: HashSet<_> = (0..1000).map(|_| generator.generate().unwrap()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
