//! Persisted volume settings.

use jiff::{Span, Zoned};
use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::types::WriteMetadata;

/// Settings for an S3-backed asset volume, as persisted by the host.
///
/// All fields are plain strings; an empty string means unset. Only `bucket`
/// and `region` are mandatory. The struct is immutable once handed to an
/// adapter; path and metadata computations happen per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeSettings {
    /// Access key id. Empty to use the ambient credential chain.
    pub key_id: String,

    /// Secret access key. Empty to use the ambient credential chain.
    /// Never serialized.
    #[serde(skip_serializing)]
    pub secret: String,

    /// Bucket holding the volume's objects. Required.
    pub bucket: String,

    /// Region the bucket lives in. Required.
    pub region: String,

    /// Subfolder all object keys are nested under.
    pub subfolder: String,

    /// Public base URL of the volume. When empty, the bucket's canonical
    /// S3 URL prefix is used.
    pub url: String,

    /// Cache expiration interval, e.g. `2 hours` or `1 month`.
    ///
    /// Parsed as a relative calendar interval on every write; an empty or
    /// unparseable value produces no cache-control header.
    pub expires: String,

    /// Storage class for uploaded objects, passed through verbatim.
    pub storage_class: String,

    /// CloudFront distribution id to invalidate after mutations.
    /// Empty disables invalidation.
    pub cf_distribution_id: String,
}

impl VolumeSettings {
    /// Standard storage class.
    pub const STORAGE_STANDARD: &'static str = "STANDARD";
    /// Reduced redundancy storage class.
    pub const STORAGE_REDUCED_REDUNDANCY: &'static str = "REDUCED_REDUNDANCY";
    /// Infrequent access storage class.
    pub const STORAGE_STANDARD_IA: &'static str = "STANDARD_IA";

    /// Creates settings for the given bucket and region.
    pub fn new(bucket: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: region.into(),
            ..Self::default()
        }
    }

    /// Sets the static credentials.
    pub fn with_credentials(
        mut self,
        key_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        self.key_id = key_id.into();
        self.secret = secret.into();
        self
    }

    /// Sets the subfolder.
    pub fn with_subfolder(mut self, subfolder: impl Into<String>) -> Self {
        self.subfolder = subfolder.into();
        self
    }

    /// Sets the public base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Sets the cache expiration interval.
    pub fn with_expires(mut self, expires: impl Into<String>) -> Self {
        self.expires = expires.into();
        self
    }

    /// Sets the storage class.
    pub fn with_storage_class(mut self, storage_class: impl Into<String>) -> Self {
        self.storage_class = storage_class.into();
        self
    }

    /// Sets the CloudFront distribution id.
    pub fn with_cf_distribution_id(mut self, cf_distribution_id: impl Into<String>) -> Self {
        self.cf_distribution_id = cf_distribution_id.into();
        self
    }

    /// Returns the well-known storage classes.
    ///
    /// Provider-defined classes outside this list are also accepted.
    pub fn storage_classes() -> [&'static str; 3] {
        [
            Self::STORAGE_STANDARD,
            Self::STORAGE_REDUCED_REDUNDANCY,
            Self::STORAGE_STANDARD_IA,
        ]
    }

    /// Validates that the mandatory fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when `bucket` or `region` is empty. This
    /// runs before any remote call is attempted.
    pub fn validate(&self) -> Result<()> {
        if self.bucket.is_empty() {
            return Err(Error::config("bucket must not be empty"));
        }
        if self.region.is_empty() {
            return Err(Error::config("region must not be empty"));
        }
        Ok(())
    }

    /// Resolves the client configuration for these settings.
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::resolve(&self.key_id, &self.secret, &self.region)
    }

    /// Maps a volume-relative path to the fully-qualified object key.
    ///
    /// The key carries no leading slash and no double slashes regardless of
    /// how the subfolder or path were entered.
    pub fn remote_key(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        let subfolder = self.subfolder.trim_matches('/');
        if subfolder.is_empty() {
            path.to_string()
        } else if path.is_empty() {
            format!("{subfolder}/")
        } else {
            format!("{subfolder}/{path}")
        }
    }

    /// Returns the volume's root URL, with exactly one trailing slash.
    ///
    /// Joins the base URL and the subfolder with exactly one slash between
    /// segments, tolerating slashes on either side of either value.
    pub fn root_url(&self) -> String {
        let base = if self.url.is_empty() {
            format!("http://{}.s3.amazonaws.com", self.bucket)
        } else {
            self.url.clone()
        };
        let base = base.trim_end_matches('/');
        let subfolder = self.subfolder.trim_matches('/');
        if subfolder.is_empty() {
            format!("{base}/")
        } else {
            format!("{base}/{subfolder}/")
        }
    }

    /// Returns the public URL for a volume-relative path.
    ///
    /// Pure string computation; no remote call is made.
    pub fn public_url(&self, path: &str) -> String {
        format!("{}{}", self.root_url(), path.trim_start_matches('/'))
    }

    /// Derives the metadata to attach to a write happening at `now`.
    ///
    /// The cache-control max-age is computed by advancing the given clock
    /// reading by the configured interval and differencing the timestamps,
    /// so calendar-relative intervals like `1 month` come out with the
    /// actual number of seconds until that date. Unset or unparseable
    /// inputs yield absent fields.
    pub fn write_metadata(&self, now: &Zoned) -> WriteMetadata {
        let mut metadata = WriteMetadata::new();

        if !self.expires.is_empty() {
            if let Ok(span) = self.expires.parse::<Span>() {
                if let Ok(expires) = now.checked_add(span) {
                    let seconds = expires.timestamp().as_second() - now.timestamp().as_second();
                    metadata = metadata
                        .with_cache_control(format!("max-age={seconds}, must-revalidate"));
                }
            }
        }

        if !self.storage_class.is_empty() {
            metadata = metadata.with_storage_class(self.storage_class.clone());
        }

        metadata
    }
}

impl Default for VolumeSettings {
    fn default() -> Self {
        Self {
            key_id: String::new(),
            secret: String::new(),
            bucket: String::new(),
            region: String::new(),
            subfolder: String::new(),
            url: String::new(),
            expires: String::new(),
            storage_class: String::new(),
            cf_distribution_id: String::new(),
        }
    }
}
