//! Per-write object metadata.

use serde::{Deserialize, Serialize};

/// Metadata attached to an object on upload.
///
/// Both fields are independently optional; an absent field is omitted from
/// the upstream request entirely. Empty strings are never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteMetadata {
    /// `Cache-Control` header value, e.g. `max-age=3600, must-revalidate`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_control: Option<String>,
    /// Provider-defined storage class, passed through verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_class: Option<String>,
}

impl WriteMetadata {
    /// Creates empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the cache-control header value.
    pub fn with_cache_control(mut self, cache_control: impl Into<String>) -> Self {
        self.cache_control = Some(cache_control.into());
        self
    }

    /// Sets the storage class.
    pub fn with_storage_class(mut self, storage_class: impl Into<String>) -> Self {
        self.storage_class = Some(storage_class.into());
        self
    }

    /// Returns whether no fields are set.
    pub fn is_empty(&self) -> bool {
        self.cache_control.is_none() && self.storage_class.is_none()
    }

    /// Overlays `explicit` on top of `self`; explicit fields win.
    pub fn merged_with(mut self, explicit: WriteMetadata) -> Self {
        if explicit.cache_control.is_some() {
            self.cache_control = explicit.cache_control;
        }
        if explicit.storage_class.is_some() {
            self.storage_class = explicit.storage_class;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_prefers_explicit_fields() {
        let derived = WriteMetadata::new()
            .with_cache_control("max-age=60, must-revalidate")
            .with_storage_class("STANDARD");
        let explicit = WriteMetadata::new().with_storage_class("STANDARD_IA");

        let merged = derived.merged_with(explicit);
        assert_eq!(
            merged.cache_control.as_deref(),
            Some("max-age=60, must-revalidate")
        );
        assert_eq!(merged.storage_class.as_deref(), Some("STANDARD_IA"));
    }

    #[test]
    fn empty_metadata_stays_empty_after_merge() {
        let merged = WriteMetadata::new().merged_with(WriteMetadata::new());
        assert!(merged.is_empty());
    }
}
