#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

// Tracing target constants for consistent logging
pub const TRACING_TARGET_VOLUME: &str = "cirrus_volume::volume";
pub const TRACING_TARGET_STORE: &str = "cirrus_volume::store";
pub const TRACING_TARGET_CDN: &str = "cirrus_volume::cdn";
pub const TRACING_TARGET_DISCOVERY: &str = "cirrus_volume::discovery";

pub mod cdn;
pub mod config;
pub mod discovery;
mod error;
pub mod store;
pub mod types;
pub mod volume;

#[doc(hidden)]
pub mod prelude;

// Re-export for convenience
pub use crate::cdn::{CdnControl, CloudFrontInvalidator, InvalidationRequest};
pub use crate::config::{ClientConfig, Credentials, VolumeSettings};
pub use crate::discovery::BucketDiscovery;
pub use crate::error::{Error, Result};
pub use crate::store::{ObjectStore, S3ObjectStore};
pub use crate::types::{BucketDescriptor, ObjectInfo, ObjectPage, VolumeEntry, WriteMetadata};
pub use crate::volume::VolumeAdapter;
