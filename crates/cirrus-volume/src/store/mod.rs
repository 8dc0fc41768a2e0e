//! Object store capability interface and implementations.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::types::{ObjectInfo, ObjectPage, WriteMetadata};

pub mod memory;
mod s3;

pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;

/// Capability interface over a remote object-storage bucket API.
///
/// Implementations hold an immutable client configuration and no other
/// mutable state, so a shared instance is safe to call from concurrent
/// tasks. Each call is a single attempt; no retries happen at this layer.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads `body` under `key`, attaching the given metadata.
    ///
    /// Unset metadata fields are omitted from the request entirely.
    async fn put_object(&self, key: &str, body: Bytes, metadata: &WriteMetadata) -> Result<()>;

    /// Fetches the object stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) when the key does
    /// not exist and [`Error::Transport`](crate::Error::Transport) on
    /// network, auth, or service failure.
    async fn get_object(&self, key: &str) -> Result<Bytes>;

    /// Removes the object stored under `key`.
    ///
    /// Deleting a missing key is a success; the operation is idempotent.
    async fn delete_object(&self, key: &str) -> Result<()>;

    /// Server-side copy from `src` to `dst` within the bucket.
    async fn copy_object(&self, src: &str, dst: &str) -> Result<()>;

    /// Fetches object metadata without downloading the body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`](crate::Error::NotFound) when the key does
    /// not exist.
    async fn head_object(&self, key: &str) -> Result<ObjectInfo>;

    /// Lists one page of keys under `prefix`, delimited on `/`.
    ///
    /// Pass the previous page's `next_token` to continue a listing. Every
    /// fresh listing is a new snapshot, not a resumed one.
    async fn list_page(&self, prefix: &str, token: Option<String>) -> Result<ObjectPage>;

    /// Lists the names of all buckets visible to the credentials.
    async fn list_buckets(&self) -> Result<Vec<String>>;

    /// Returns the region `bucket` lives in, as reported by the provider.
    async fn bucket_location(&self, bucket: &str) -> Result<String>;
}
