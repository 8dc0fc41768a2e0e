//! CDN invalidation capability interface and implementations.

use async_trait::async_trait;
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod memory;

mod cloudfront;

pub use cloudfront::CloudFrontInvalidator;
pub use memory::MemoryCdn;

/// Number of random characters in a caller reference token.
const CALLER_REFERENCE_LEN: usize = 24;

/// A request to purge cached copies of specific paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationRequest {
    /// Distribution whose caches are purged.
    pub distribution_id: String,
    /// Absolute paths to purge, each with a leading slash.
    pub paths: Vec<String>,
    /// Idempotency token; must be unique per request.
    pub caller_reference: String,
}

impl InvalidationRequest {
    /// Creates a request for a single path with a fresh caller reference.
    pub fn for_path(distribution_id: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            distribution_id: distribution_id.into(),
            paths: vec![path.into()],
            caller_reference: caller_reference(),
        }
    }
}

/// Generates a fresh caller reference token.
///
/// The downstream control plane treats the reference as an idempotency key,
/// so every request needs a new one; collisions are negligible at this
/// length.
pub fn caller_reference() -> String {
    let token: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(CALLER_REFERENCE_LEN)
        .map(char::from)
        .collect();
    format!("cirrus-{token}")
}

/// Capability interface over a CDN's purge-by-path control API.
#[async_trait]
pub trait CdnControl: Send + Sync {
    /// Submits one invalidation batch.
    async fn create_invalidation(&self, request: &InvalidationRequest) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_references_are_unique_and_long_enough() {
        let first = caller_reference();
        let second = caller_reference();
        assert_ne!(first, second);
        assert!(first.len() >= CALLER_REFERENCE_LEN);
    }

    #[test]
    fn for_path_builds_a_single_path_request() {
        let request = InvalidationRequest::for_path("E2EXAMPLE", "/photos/img.png");
        assert_eq!(request.distribution_id, "E2EXAMPLE");
        assert_eq!(request.paths, ["/photos/img.png"]);
        assert!(!request.caller_reference.is_empty());
    }
}
