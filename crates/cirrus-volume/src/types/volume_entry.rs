//! Listing entries produced by the volume adapter.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// One entry in a volume listing.
///
/// Paths are relative to the volume root, with the configured subfolder
/// already stripped. Directory entries are synthesized from common key
/// prefixes; no real directory objects exist upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeEntry {
    /// Volume-relative path, without a trailing slash.
    pub path: String,
    /// Size in bytes; always 0 for directories.
    pub size: u64,
    /// Last modified timestamp; absent for directories.
    pub last_modified: Option<Timestamp>,
    /// Whether this entry is a synthesized directory.
    pub is_directory: bool,
}

impl VolumeEntry {
    /// Creates a file entry.
    pub fn file(path: impl Into<String>, size: u64) -> Self {
        Self {
            path: path.into(),
            size,
            last_modified: None,
            is_directory: false,
        }
    }

    /// Creates a synthesized directory entry.
    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            size: 0,
            last_modified: None,
            is_directory: true,
        }
    }

    /// Sets the last modified timestamp.
    pub fn with_last_modified(mut self, last_modified: Timestamp) -> Self {
        self.last_modified = Some(last_modified);
        self
    }
}
