//! Bucket descriptors produced by setup-time discovery.

use serde::{Deserialize, Serialize};

/// One bucket visible to a set of credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketDescriptor {
    /// Bucket name.
    pub name: String,
    /// Region the bucket lives in, as reported by the provider.
    ///
    /// The provider reports the legacy empty string for `us-east-1`;
    /// the value is passed through unchanged.
    pub region: String,
    /// Public URL prefix for objects in this bucket.
    pub url_prefix: String,
}

impl BucketDescriptor {
    /// Creates a descriptor, deriving the public URL prefix from the name.
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Self {
        let name = name.into();
        let url_prefix = format!("http://{name}.s3.amazonaws.com/");
        Self {
            name,
            region: region.into(),
            url_prefix,
        }
    }
}
