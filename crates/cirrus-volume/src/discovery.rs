//! Setup-time bucket discovery.
//!
//! Enumerates the buckets a set of credentials can see so a host's setup
//! surface can offer them for selection. Stands on the object-store
//! capability alone; it has no use for the filesystem adapter.

use std::sync::Arc;

use tracing::{debug, info};

use crate::TRACING_TARGET_DISCOVERY;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::store::{ObjectStore, S3ObjectStore};
use crate::types::BucketDescriptor;

/// Region used to bootstrap discovery clients.
///
/// Bucket listing is region-agnostic, so any valid region works here.
pub const BOOTSTRAP_REGION: &str = "us-east-1";

/// Enumerates accessible buckets and their regions.
pub struct BucketDiscovery {
    store: Arc<dyn ObjectStore>,
}

impl BucketDiscovery {
    /// Creates a discovery over an existing object store.
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Connects a discovery client with bare credentials.
    ///
    /// Empty credentials fall back to the ambient credential chain, same as
    /// the adapter. The bootstrap region is fixed; no bucket is selected
    /// yet at this point.
    pub async fn connect(key_id: &str, secret: &str) -> Self {
        let config = ClientConfig::resolve(key_id, secret, BOOTSTRAP_REGION);
        let store = S3ObjectStore::connect(&config, String::new()).await;
        Self::new(Arc::new(store))
    }

    /// Connects with bare credentials and lists the visible buckets.
    ///
    /// One-shot convenience for setup surfaces that have nothing but a
    /// key pair yet.
    pub async fn load_bucket_list(key_id: &str, secret: &str) -> Result<Vec<BucketDescriptor>> {
        Self::connect(key_id, secret).await.list_buckets().await
    }

    /// Lists all buckets visible to the credentials, with their regions.
    ///
    /// A bucket whose region lookup fails (e.g. list permission without
    /// per-bucket location permission) is skipped and the rest are
    /// returned; partial results are expected. An account with zero
    /// buckets yields an empty vec, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only when the bucket listing itself fails.
    pub async fn list_buckets(&self) -> Result<Vec<BucketDescriptor>> {
        let names = self.store.list_buckets().await?;

        let mut buckets = Vec::with_capacity(names.len());
        for name in names {
            match self.store.bucket_location(&name).await {
                Ok(region) => buckets.push(BucketDescriptor::new(name, region)),
                Err(err) => {
                    debug!(
                        target: TRACING_TARGET_DISCOVERY,
                        bucket = %name,
                        error = %err,
                        "Skipping bucket with inaccessible region"
                    );
                }
            }
        }

        info!(
            target: TRACING_TARGET_DISCOVERY,
            count = buckets.len(),
            "Buckets discovered"
        );

        Ok(buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryObjectStore;

    #[tokio::test]
    async fn denied_region_lookups_are_skipped_silently() {
        let store = MemoryObjectStore::new()
            .with_bucket("alpha", "eu-west-1")
            .with_bucket("beta", "us-east-2")
            .with_bucket("gamma", "ap-south-1")
            .with_denied_location("beta");

        let discovery = BucketDiscovery::new(Arc::new(store));
        let buckets = discovery.list_buckets().await.unwrap();

        let names: Vec<_> = buckets.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["alpha", "gamma"]);
        assert_eq!(buckets[0].region, "eu-west-1");
        assert_eq!(buckets[0].url_prefix, "http://alpha.s3.amazonaws.com/");
    }

    #[tokio::test]
    async fn zero_buckets_is_an_empty_list() {
        let discovery = BucketDiscovery::new(Arc::new(MemoryObjectStore::new()));
        assert!(discovery.list_buckets().await.unwrap().is_empty());
    }
}
