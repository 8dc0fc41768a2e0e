//! Prelude module for convenient imports.

pub use crate::cdn::{CdnControl, CloudFrontInvalidator, InvalidationRequest};
pub use crate::config::{ClientConfig, Credentials, VolumeSettings};
pub use crate::discovery::BucketDiscovery;
pub use crate::error::{Error, Result};
pub use crate::store::{ObjectStore, S3ObjectStore};
pub use crate::types::{BucketDescriptor, ObjectInfo, ObjectPage, VolumeEntry, WriteMetadata};
pub use crate::volume::VolumeAdapter;
