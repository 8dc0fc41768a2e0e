//! The filesystem adapter over an object-storage bucket.
//!
//! [`VolumeAdapter`] maps the host's filesystem contract onto a flat
//! keyspace: paths are prefixed with the configured subfolder, directories
//! are synthesized from common key prefixes, and rename is copy-then-delete
//! since no upstream rename primitive exists. Mutations purge the matching
//! CDN path after they succeed.

use std::fmt;
use std::sync::Arc;

use async_stream::try_stream;
use bytes::Bytes;
use futures::stream::BoxStream;
use jiff::Zoned;
use tracing::{debug, info, instrument, warn};

use crate::cdn::{CdnControl, CloudFrontInvalidator, InvalidationRequest};
use crate::config::VolumeSettings;
use crate::error::{Error, Result};
use crate::store::{ObjectStore, S3ObjectStore};
use crate::types::{ObjectInfo, VolumeEntry, WriteMetadata};
use crate::{TRACING_TARGET_CDN, TRACING_TARGET_VOLUME};

/// Filesystem adapter over an object-storage bucket.
///
/// Holds an immutable configuration and shared client handles, so one
/// instance is safe to use from concurrent tasks. Callers that mutate the
/// same path concurrently are responsible for their own serialization; no
/// compare-and-swap or locking happens here.
#[derive(Clone)]
pub struct VolumeAdapter {
    settings: VolumeSettings,
    store: Arc<dyn ObjectStore>,
    cdn: Option<Arc<dyn CdnControl>>,
}

impl VolumeAdapter {
    /// Connects the adapter to S3 and, when a distribution id is
    /// configured, CloudFront.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the settings are invalid. Validation
    /// happens before any remote client is constructed.
    pub async fn connect(settings: VolumeSettings) -> Result<Self> {
        settings.validate()?;

        let config = settings.client_config();
        let store = S3ObjectStore::connect(&config, settings.bucket.clone()).await;
        let cdn: Option<Arc<dyn CdnControl>> = if settings.cf_distribution_id.is_empty() {
            None
        } else {
            Some(Arc::new(CloudFrontInvalidator::connect(&config).await))
        };

        Ok(Self {
            settings,
            store: Arc::new(store),
            cdn,
        })
    }

    /// Creates an adapter over explicit store and CDN implementations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the settings are invalid.
    pub fn with_components(
        settings: VolumeSettings,
        store: Arc<dyn ObjectStore>,
        cdn: Option<Arc<dyn CdnControl>>,
    ) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            store,
            cdn,
        })
    }

    /// Returns the settings this adapter was built from.
    pub fn settings(&self) -> &VolumeSettings {
        &self.settings
    }

    /// Maps a volume-relative path to its fully-qualified object key.
    ///
    /// Exposed so host-side hooks (e.g. focal-point detection on newly
    /// saved assets) can address the stored object directly.
    pub fn remote_key(&self, path: &str) -> String {
        self.settings.remote_key(path)
    }

    /// Returns the volume's root URL with exactly one trailing slash.
    pub fn root_url(&self) -> String {
        self.settings.root_url()
    }

    /// Returns the public URL for a volume-relative path.
    ///
    /// Pure string computation; no remote call is made.
    pub fn public_url(&self, path: &str) -> String {
        self.settings.public_url(path)
    }

    /// Returns the local filesystem root of this volume.
    ///
    /// Always `None`: the volume is never locally addressable.
    pub fn root_path(&self) -> Option<String> {
        None
    }

    /// Reads the object stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the path does not exist.
    #[instrument(skip(self), target = TRACING_TARGET_VOLUME, fields(path = %path))]
    pub async fn read(&self, path: &str) -> Result<Bytes> {
        let key = self.remote_key(path);
        self.store
            .get_object(&key)
            .await
            .map_err(|err| relabel_not_found(err, path))
    }

    /// Writes `contents` to `path`, then purges the CDN path.
    ///
    /// Write metadata is derived from the settings (cache-control from the
    /// expiration interval, storage class verbatim); `explicit` fields win
    /// over derived ones. Invalidation runs strictly after the upload is
    /// acknowledged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invalidation`] when the upload succeeded but the
    /// purge failed; the written data is durable in that case.
    #[instrument(skip(self, contents, explicit), target = TRACING_TARGET_VOLUME, fields(path = %path, size = contents.len()))]
    pub async fn write(
        &self,
        path: &str,
        contents: Bytes,
        explicit: Option<WriteMetadata>,
    ) -> Result<()> {
        let key = self.remote_key(path);
        let mut metadata = self.settings.write_metadata(&Zoned::now());
        if let Some(explicit) = explicit {
            metadata = metadata.merged_with(explicit);
        }

        self.store.put_object(&key, contents, &metadata).await?;

        info!(
            target: TRACING_TARGET_VOLUME,
            path = %path,
            key = %key,
            "Asset written"
        );

        self.invalidate_cdn_path(path).await
    }

    /// Deletes the object at `path`, then purges the CDN path.
    ///
    /// Deleting a missing path is a success; the operation is idempotent.
    #[instrument(skip(self), target = TRACING_TARGET_VOLUME, fields(path = %path))]
    pub async fn delete(&self, path: &str) -> Result<()> {
        let key = self.remote_key(path);
        self.store.delete_object(&key).await?;

        info!(
            target: TRACING_TARGET_VOLUME,
            path = %path,
            "Asset deleted"
        );

        self.invalidate_cdn_path(path).await
    }

    /// Copies `src` to `dst`, then purges the destination CDN path.
    #[instrument(skip(self), target = TRACING_TARGET_VOLUME, fields(src = %src, dst = %dst))]
    pub async fn copy(&self, src: &str, dst: &str) -> Result<()> {
        let src_key = self.remote_key(src);
        let dst_key = self.remote_key(dst);
        self.store.copy_object(&src_key, &dst_key).await?;

        self.invalidate_cdn_path(dst).await
    }

    /// Moves `src` to `dst` as copy-then-delete, then purges both CDN
    /// paths.
    ///
    /// Object stores have no atomic rename: if the source delete fails
    /// after a successful copy, the result is a duplicate rather than a
    /// moved object. Treat this as at-least-once copy with best-effort
    /// source cleanup.
    #[instrument(skip(self), target = TRACING_TARGET_VOLUME, fields(src = %src, dst = %dst))]
    pub async fn rename(&self, src: &str, dst: &str) -> Result<()> {
        let src_key = self.remote_key(src);
        let dst_key = self.remote_key(dst);

        self.store.copy_object(&src_key, &dst_key).await?;
        self.store.delete_object(&src_key).await?;

        info!(
            target: TRACING_TARGET_VOLUME,
            src = %src,
            dst = %dst,
            "Asset renamed"
        );

        self.invalidate_cdn_path(dst).await?;
        self.invalidate_cdn_path(src).await
    }

    /// Returns the metadata entry for `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the path does not exist.
    #[instrument(skip(self), target = TRACING_TARGET_VOLUME, fields(path = %path))]
    pub async fn metadata(&self, path: &str) -> Result<VolumeEntry> {
        let key = self.remote_key(path);
        let info = self
            .store
            .head_object(&key)
            .await
            .map_err(|err| relabel_not_found(err, path))?;

        let mut entry = VolumeEntry::file(path.trim_start_matches('/'), info.size);
        if let Some(last_modified) = info.last_modified {
            entry = entry.with_last_modified(last_modified);
        }
        Ok(entry)
    }

    /// Returns whether an object exists at `path`.
    pub async fn exists(&self, path: &str) -> Result<bool> {
        match self.metadata(path).await {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Lazily lists the entries under `prefix`.
    ///
    /// Directory entries are synthesized from common key prefixes. The
    /// stream is finite; consuming it again via a fresh `list` call yields
    /// a new snapshot, not a resumed one.
    pub fn list<'a>(&'a self, prefix: &str) -> BoxStream<'a, Result<VolumeEntry>> {
        let remote_prefix = self.list_prefix(prefix);

        Box::pin(try_stream! {
            let mut token = None;
            loop {
                let page = self.store.list_page(&remote_prefix, token.take()).await?;

                for common_prefix in page.common_prefixes {
                    if let Some(entry) = self.directory_entry(&common_prefix) {
                        yield entry;
                    }
                }
                for object in page.objects {
                    // A zero-byte placeholder under the listed prefix is the
                    // simulated directory itself, not a file in it.
                    if object.key == remote_prefix {
                        continue;
                    }
                    if let Some(entry) = self.file_entry(object) {
                        yield entry;
                    }
                }

                match page.next_token {
                    Some(next) => token = Some(next),
                    None => break,
                }
            }
        })
    }

    /// Purges the CDN's cached copy of `path`.
    ///
    /// A no-op success when no distribution id is configured. One request
    /// is issued per call, for the single absolute path, with a fresh
    /// caller reference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Invalidation`] naming the path when the control
    /// plane rejects the request.
    pub async fn invalidate_cdn_path(&self, path: &str) -> Result<()> {
        let Some(cdn) = &self.cdn else {
            return Ok(());
        };
        if self.settings.cf_distribution_id.is_empty() {
            return Ok(());
        }

        let cdn_path = format!("/{}", path.trim_start_matches('/'));
        let request =
            InvalidationRequest::for_path(&self.settings.cf_distribution_id, cdn_path);

        debug!(
            target: TRACING_TARGET_CDN,
            path = %path,
            distribution = %self.settings.cf_distribution_id,
            "Invalidating CDN path"
        );

        match cdn.create_invalidation(&request).await {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!(
                    target: TRACING_TARGET_CDN,
                    path = %path,
                    error = %err,
                    "CDN invalidation failed"
                );
                Err(Error::invalidation(path, err))
            }
        }
    }

    fn list_prefix(&self, prefix: &str) -> String {
        let key = self.settings.remote_key(prefix);
        if key.is_empty() || key.ends_with('/') {
            key
        } else {
            format!("{key}/")
        }
    }

    fn relative_path(&self, key: &str) -> String {
        let subfolder = self.settings.subfolder.trim_matches('/');
        let stripped = if subfolder.is_empty() {
            key
        } else {
            key.strip_prefix(subfolder)
                .map(|rest| rest.trim_start_matches('/'))
                .unwrap_or(key)
        };
        stripped.trim_end_matches('/').to_string()
    }

    fn directory_entry(&self, common_prefix: &str) -> Option<VolumeEntry> {
        let path = self.relative_path(common_prefix);
        (!path.is_empty()).then(|| VolumeEntry::directory(path))
    }

    fn file_entry(&self, object: ObjectInfo) -> Option<VolumeEntry> {
        let path = self.relative_path(&object.key);
        if path.is_empty() {
            return None;
        }
        let mut entry = VolumeEntry::file(path, object.size);
        if let Some(last_modified) = object.last_modified {
            entry = entry.with_last_modified(last_modified);
        }
        Some(entry)
    }
}

/// Renames a store-level not-found error to the volume-relative path the
/// caller asked about.
fn relabel_not_found(err: Error, path: &str) -> Error {
    if err.is_not_found() {
        Error::not_found(path)
    } else {
        err
    }
}

impl fmt::Debug for VolumeAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key_id = self
            .settings
            .client_config()
            .credentials
            .map(|credentials| credentials.key_id_masked());
        f.debug_struct("VolumeAdapter")
            .field("bucket", &self.settings.bucket)
            .field("region", &self.settings.region)
            .field("subfolder", &self.settings.subfolder)
            .field("cf_distribution_id", &self.settings.cf_distribution_id)
            .field("key_id", &key_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use futures::TryStreamExt;

    use super::*;
    use crate::cdn::MemoryCdn;
    use crate::store::MemoryObjectStore;

    fn settings() -> VolumeSettings {
        VolumeSettings::new("assets", "eu-west-1").with_subfolder("sub")
    }

    fn adapter_with(
        store: Arc<MemoryObjectStore>,
        cdn: Option<Arc<MemoryCdn>>,
        settings: VolumeSettings,
    ) -> VolumeAdapter {
        let cdn = cdn.map(|cdn| cdn as Arc<dyn CdnControl>);
        VolumeAdapter::with_components(settings, store, cdn).unwrap()
    }

    #[test]
    fn construction_rejects_invalid_settings() {
        let store: Arc<dyn ObjectStore> = Arc::new(MemoryObjectStore::new());
        let err = VolumeAdapter::with_components(VolumeSettings::default(), store, None)
            .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn root_path_is_never_local() {
        let adapter = adapter_with(Arc::new(MemoryObjectStore::new()), None, settings());
        assert!(adapter.root_path().is_none());
    }

    #[test]
    fn debug_output_masks_the_key_id() {
        let adapter = adapter_with(
            Arc::new(MemoryObjectStore::new()),
            None,
            settings().with_credentials("AKIATEST12345", "s3cr3t"),
        );
        let debug = format!("{adapter:?}");
        assert!(debug.contains("AKIA***"));
        assert!(!debug.contains("s3cr3t"));
        assert!(!debug.contains("AKIATEST12345"));
    }

    #[tokio::test]
    async fn write_applies_derived_metadata() {
        let store = Arc::new(MemoryObjectStore::new());
        let adapter = adapter_with(
            store.clone(),
            None,
            settings()
                .with_expires("2 hours")
                .with_storage_class(VolumeSettings::STORAGE_STANDARD_IA),
        );

        adapter
            .write("photos/img.png", Bytes::from_static(b"png"), None)
            .await
            .unwrap();

        let metadata = store.stored_metadata("sub/photos/img.png").unwrap();
        assert_eq!(
            metadata.cache_control.as_deref(),
            Some("max-age=7200, must-revalidate")
        );
        assert_eq!(metadata.storage_class.as_deref(), Some("STANDARD_IA"));
    }

    #[tokio::test]
    async fn write_prefers_explicit_metadata() {
        let store = Arc::new(MemoryObjectStore::new());
        let adapter = adapter_with(
            store.clone(),
            None,
            settings().with_storage_class(VolumeSettings::STORAGE_STANDARD),
        );

        let explicit = WriteMetadata::new().with_storage_class("GLACIER");
        adapter
            .write("a.bin", Bytes::from_static(b"x"), Some(explicit))
            .await
            .unwrap();

        let metadata = store.stored_metadata("sub/a.bin").unwrap();
        assert_eq!(metadata.storage_class.as_deref(), Some("GLACIER"));
    }

    #[tokio::test]
    async fn invalidation_is_a_noop_without_a_distribution() {
        let cdn = Arc::new(MemoryCdn::new());
        let adapter = adapter_with(
            Arc::new(MemoryObjectStore::new()),
            Some(cdn.clone()),
            settings(),
        );

        adapter
            .write("photos/img.png", Bytes::from_static(b"png"), None)
            .await
            .unwrap();
        assert!(cdn.requests().is_empty());
    }

    #[tokio::test]
    async fn listing_synthesizes_directories() {
        let store = Arc::new(MemoryObjectStore::new());
        let adapter = adapter_with(store.clone(), None, settings());

        for path in ["a.txt", "photos/b.png", "photos/c.png"] {
            adapter
                .write(path, Bytes::from_static(b"x"), None)
                .await
                .unwrap();
        }

        let entries: Vec<VolumeEntry> = adapter.list("").try_collect().await.unwrap();
        let directories: Vec<_> = entries
            .iter()
            .filter(|entry| entry.is_directory)
            .map(|entry| entry.path.as_str())
            .collect();
        let files: Vec<_> = entries
            .iter()
            .filter(|entry| !entry.is_directory)
            .map(|entry| entry.path.as_str())
            .collect();

        assert_eq!(directories, ["photos"]);
        assert_eq!(files, ["a.txt"]);

        let nested: Vec<VolumeEntry> = adapter.list("photos").try_collect().await.unwrap();
        let nested_files: Vec<_> = nested.iter().map(|entry| entry.path.as_str()).collect();
        assert_eq!(nested_files, ["photos/b.png", "photos/c.png"]);
    }

    #[tokio::test]
    async fn exists_distinguishes_missing_paths() {
        let adapter = adapter_with(Arc::new(MemoryObjectStore::new()), None, settings());
        assert!(!adapter.exists("nope.txt").await.unwrap());

        adapter
            .write("yes.txt", Bytes::from_static(b"x"), None)
            .await
            .unwrap();
        assert!(adapter.exists("yes.txt").await.unwrap());
    }

    #[tokio::test]
    async fn not_found_errors_name_the_relative_path() {
        let adapter = adapter_with(Arc::new(MemoryObjectStore::new()), None, settings());
        let err = adapter.read("photos/missing.png").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("photos/missing.png"));
        assert!(!err.to_string().contains("sub/"));
    }
}
