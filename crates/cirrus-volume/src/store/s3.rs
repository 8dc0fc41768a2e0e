//! S3-backed object store using the AWS SDK.
//!
//! Works with AWS S3 and S3-compatible services reachable through the
//! default endpoint resolution of the SDK.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::StorageClass;
use bytes::Bytes;
use jiff::Timestamp;
use tracing::{debug, info};

use crate::TRACING_TARGET_STORE;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::store::ObjectStore;
use crate::types::{ObjectInfo, ObjectPage, WriteMetadata};

/// Object store backed by an S3 bucket.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Creates a store for `bucket` from a resolved client configuration.
    ///
    /// When the configuration carries no credentials the SDK's default
    /// provider chain is used (environment variables, instance roles,
    /// shared credential files). `bucket` may be empty for account-scoped
    /// use such as bucket discovery.
    pub async fn connect(config: &ClientConfig, bucket: impl Into<String>) -> Self {
        let bucket = bucket.into();
        let region = Region::new(config.region.clone());

        let client = match &config.credentials {
            Some(credentials) => {
                let provider = aws_sdk_s3::config::Credentials::new(
                    credentials.key_id.clone(),
                    credentials.secret.clone(),
                    None,
                    None,
                    "volume-settings",
                );
                let conf = aws_sdk_s3::Config::builder()
                    .behavior_version(BehaviorVersion::latest())
                    .region(region)
                    .credentials_provider(provider)
                    .build();
                Client::from_conf(conf)
            }
            None => {
                let sdk_config = aws_config::defaults(BehaviorVersion::latest())
                    .region(region)
                    .load()
                    .await;
                Client::new(&sdk_config)
            }
        };

        info!(
            target: TRACING_TARGET_STORE,
            bucket = %bucket,
            region = %config.region,
            static_credentials = config.credentials.is_some(),
            "S3 object store initialized"
        );

        Self { client, bucket }
    }

    /// Returns the bucket this store operates on.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, key: &str, body: Bytes, metadata: &WriteMetadata) -> Result<()> {
        debug!(
            target: TRACING_TARGET_STORE,
            bucket = %self.bucket,
            key = %key,
            size = body.len(),
            "Uploading object"
        );

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body));

        if let Some(cache_control) = &metadata.cache_control {
            request = request.cache_control(cache_control);
        }
        if let Some(storage_class) = &metadata.storage_class {
            request = request.storage_class(StorageClass::from(storage_class.as_str()));
        }

        request.send().await.map_err(Error::transport)?;

        info!(
            target: TRACING_TARGET_STORE,
            bucket = %self.bucket,
            key = %key,
            "Object uploaded"
        );

        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Bytes> {
        debug!(
            target: TRACING_TARGET_STORE,
            bucket = %self.bucket,
            key = %key,
            "Fetching object"
        );

        let response = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let service_error = err.into_service_error();
                if service_error.is_no_such_key() {
                    Error::not_found(key)
                } else {
                    Error::transport(service_error)
                }
            })?;

        let data = response.body.collect().await.map_err(Error::transport)?;
        Ok(data.into_bytes())
    }

    async fn delete_object(&self, key: &str) -> Result<()> {
        debug!(
            target: TRACING_TARGET_STORE,
            bucket = %self.bucket,
            key = %key,
            "Deleting object"
        );

        // S3 delete succeeds for missing keys, which keeps this idempotent.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(Error::transport)?;

        info!(
            target: TRACING_TARGET_STORE,
            bucket = %self.bucket,
            key = %key,
            "Object deleted"
        );

        Ok(())
    }

    async fn copy_object(&self, src: &str, dst: &str) -> Result<()> {
        debug!(
            target: TRACING_TARGET_STORE,
            bucket = %self.bucket,
            src = %src,
            dst = %dst,
            "Copying object"
        );

        self.client
            .copy_object()
            .bucket(&self.bucket)
            .copy_source(format!("{}/{}", self.bucket, src))
            .key(dst)
            .send()
            .await
            .map_err(Error::transport)?;

        Ok(())
    }

    async fn head_object(&self, key: &str) -> Result<ObjectInfo> {
        let response = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| {
                let service_error = err.into_service_error();
                if service_error.is_not_found() {
                    Error::not_found(key)
                } else {
                    Error::transport(service_error)
                }
            })?;

        let size = response.content_length().unwrap_or(0).max(0) as u64;
        let mut info = ObjectInfo::new(key, size);
        if let Some(last_modified) = response.last_modified() {
            if let Ok(timestamp) = Timestamp::from_second(last_modified.secs()) {
                info = info.with_last_modified(timestamp);
            }
        }
        if let Some(etag) = response.e_tag() {
            info = info.with_etag(etag);
        }

        Ok(info)
    }

    async fn list_page(&self, prefix: &str, token: Option<String>) -> Result<ObjectPage> {
        debug!(
            target: TRACING_TARGET_STORE,
            bucket = %self.bucket,
            prefix = %prefix,
            continued = token.is_some(),
            "Listing objects"
        );

        let mut request = self
            .client
            .list_objects_v2()
            .bucket(&self.bucket)
            .delimiter("/");
        if !prefix.is_empty() {
            request = request.prefix(prefix);
        }
        if let Some(token) = token {
            request = request.continuation_token(token);
        }

        let response = request.send().await.map_err(Error::transport)?;

        let objects = response
            .contents()
            .iter()
            .filter_map(|object| {
                let key = object.key()?.to_string();
                let size = object.size().unwrap_or(0).max(0) as u64;
                let mut info = ObjectInfo::new(key, size);
                if let Some(last_modified) = object.last_modified() {
                    if let Ok(timestamp) = Timestamp::from_second(last_modified.secs()) {
                        info = info.with_last_modified(timestamp);
                    }
                }
                if let Some(etag) = object.e_tag() {
                    info = info.with_etag(etag);
                }
                Some(info)
            })
            .collect();

        let common_prefixes = response
            .common_prefixes()
            .iter()
            .filter_map(|common| common.prefix().map(str::to_string))
            .collect();

        Ok(ObjectPage {
            objects,
            common_prefixes,
            next_token: response.next_continuation_token().map(str::to_string),
        })
    }

    async fn list_buckets(&self) -> Result<Vec<String>> {
        debug!(target: TRACING_TARGET_STORE, "Listing buckets");

        let response = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(Error::transport)?;

        Ok(response
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(str::to_string))
            .collect())
    }

    async fn bucket_location(&self, bucket: &str) -> Result<String> {
        let response = self
            .client
            .get_bucket_location()
            .bucket(bucket)
            .send()
            .await
            .map_err(Error::transport)?;

        // The legacy empty constraint for us-east-1 is passed through as-is.
        Ok(response
            .location_constraint()
            .map(|constraint| constraint.as_str().to_string())
            .unwrap_or_default())
    }
}
