//! CloudFront-backed CDN invalidation using the AWS SDK.

use async_trait::async_trait;
use aws_sdk_cloudfront::Client;
use aws_sdk_cloudfront::config::{BehaviorVersion, Region};
use aws_sdk_cloudfront::types::{InvalidationBatch, Paths};
use tracing::{debug, info};

use crate::TRACING_TARGET_CDN;
use crate::cdn::{CdnControl, InvalidationRequest};
use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// CDN control plane backed by CloudFront.
#[derive(Debug, Clone)]
pub struct CloudFrontInvalidator {
    client: Client,
}

impl CloudFrontInvalidator {
    /// Creates an invalidator from a resolved client configuration.
    ///
    /// When the configuration carries no credentials the SDK's default
    /// provider chain is used, same as the object store.
    pub async fn connect(config: &ClientConfig) -> Self {
        let region = Region::new(config.region.clone());

        let client = match &config.credentials {
            Some(credentials) => {
                let provider = aws_sdk_cloudfront::config::Credentials::new(
                    credentials.key_id.clone(),
                    credentials.secret.clone(),
                    None,
                    None,
                    "volume-settings",
                );
                let conf = aws_sdk_cloudfront::Config::builder()
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

        Self { client }
    }
}

#[async_trait]
impl CdnControl for CloudFrontInvalidator {
    async fn create_invalidation(&self, request: &InvalidationRequest) -> Result<()> {
        debug!(
            target: TRACING_TARGET_CDN,
            distribution = %request.distribution_id,
            paths = ?request.paths,
            "Submitting invalidation"
        );

        let paths = Paths::builder()
            .quantity(request.paths.len() as i32)
            .set_items(Some(request.paths.clone()))
            .build()
            .map_err(Error::transport)?;

        let batch = InvalidationBatch::builder()
            .paths(paths)
            .caller_reference(&request.caller_reference)
            .build()
            .map_err(Error::transport)?;

        self.client
            .create_invalidation()
            .distribution_id(&request.distribution_id)
            .invalidation_batch(batch)
            .send()
            .await
            .map_err(Error::transport)?;

        info!(
            target: TRACING_TARGET_CDN,
            distribution = %request.distribution_id,
            paths = ?request.paths,
            "Invalidation submitted"
        );

        Ok(())
    }
}
