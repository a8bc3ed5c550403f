//! Object store seam for the S3 tier

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;

use super::config::S3CacheConfig;
use crate::cache::CacheError;

/// Minimal get/put surface the S3 cache needs from a remote store
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object; `Ok(None)` when the key does not exist
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError>;

    /// Upload an object, replacing any previous version
    async fn put(&self, key: &str, data: Bytes) -> Result<(), CacheError>;
}

/// `ObjectStore` backed by the AWS SDK
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    /// Build a client from configuration
    ///
    /// Explicit keys win; otherwise the SDK's default credential chain
    /// (environment, profile, instance role) is used.
    pub async fn connect(config: &S3CacheConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        if let Some((access_key, secret_key)) = config.credentials() {
            loader = loader.credentials_provider(aws_credential_types::Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "rendition-config",
            ));
        }

        let sdk_config = loader.load().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = config.endpoint.as_deref().unwrap_or("default"),
            explicit_credentials = config.credentials().is_some(),
            "S3 object store configured"
        );

        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        let result = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        let output = match result {
            Ok(output) => output,
            Err(err) => {
                let no_such_key = err
                    .as_service_error()
                    .map(|e| e.is_no_such_key())
                    .unwrap_or(false);
                let status_404 = err
                    .raw_response()
                    .map(|r| r.status().as_u16() == 404)
                    .unwrap_or(false);
                if no_such_key || status_404 {
                    return Ok(None);
                }
                return Err(CacheError::Remote(format!(
                    "GetObject s3://{}/{} failed: {}",
                    self.bucket, key, err
                )));
            }
        };

        let body = output.body.collect().await.map_err(|e| {
            CacheError::Remote(format!(
                "Reading body of s3://{}/{} failed: {}",
                self.bucket, key, e
            ))
        })?;
        Ok(Some(body.into_bytes()))
    }

    async fn put(&self, key: &str, data: Bytes) -> Result<(), CacheError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/octet-stream")
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                CacheError::Remote(format!(
                    "PutObject s3://{}/{} failed: {}",
                    self.bucket, key, e
                ))
            })?;
        Ok(())
    }
}
