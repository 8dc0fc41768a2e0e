//! Object metadata structures returned by the object store.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Information about a stored object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectInfo {
    /// Fully-qualified object key.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
    /// Last modified timestamp, when the store reports one.
    pub last_modified: Option<Timestamp>,
    /// ETag of the object.
    pub etag: Option<String>,
}

impl ObjectInfo {
    /// Creates a new ObjectInfo.
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified: None,
            etag: None,
        }
    }

    /// Sets the last modified timestamp.
    pub fn with_last_modified(mut self, last_modified: Timestamp) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Sets the ETag.
    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }
}

/// One page of a prefix listing.
///
/// Keys sharing a path segment below the listed prefix are folded into
/// `common_prefixes`, the way a delimiter listing reports simulated
/// directories over a flat keyspace.
#[derive(Debug, Clone, Default)]
pub struct ObjectPage {
    /// Objects directly under the listed prefix.
    pub objects: Vec<ObjectInfo>,
    /// Key prefixes one level below the listed prefix.
    pub common_prefixes: Vec<String>,
    /// Continuation token for the next page, if the listing is truncated.
    pub next_token: Option<String>,
}
