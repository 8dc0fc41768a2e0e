//! Plain-value types shared across the volume adapter.

mod bucket_descriptor;
mod object_info;
mod volume_entry;
mod write_metadata;

pub use bucket_descriptor::BucketDescriptor;
pub use object_info::{ObjectInfo, ObjectPage};
pub use volume_entry::VolumeEntry;
pub use write_metadata::WriteMetadata;
