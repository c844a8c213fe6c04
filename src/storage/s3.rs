use super::ObjectStore;
use crate::{
    error::{PosterError, Result},
    models::storage::{SignedUrl, StoredImage},
};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::{
    error::ProvideErrorMetadata, presigning::PresigningConfig, primitives::ByteStream, Client,
};
use chrono::Utc;
use std::time::Duration;

#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        let bucket = bucket.into();
        log::info!("Initialized S3 store for bucket: {}", bucket);
        Self { client, bucket }
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig, bucket: impl Into<String>) -> Self {
        Self::new(Client::new(sdk_config), bucket)
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn put_object(&self, image: &StoredImage) -> Result<()> {
        log::debug!(
            "Uploading {} bytes to s3://{}/{}",
            image.bytes.len(),
            self.bucket,
            image.key
        );

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&image.key)
            .content_type(&image.content_type)
            .body(ByteStream::from(image.bytes.clone()))
            .send()
            .await
            .map_err(|e| {
                log::error!("Failed to upload {}: {:?}", image.key, e);

                if let Some(service_error) = e.as_service_error() {
                    PosterError::StorageFailed(format!(
                        "S3 service error: {} - {}",
                        service_error.code().unwrap_or("unknown"),
                        service_error.message().unwrap_or("no message")
                    ))
                } else {
                    PosterError::StorageFailed(format!("AWS SDK error: {}", e))
                }
            })?;

        log::info!("Stored poster at s3://{}/{}", self.bucket, image.key);
        Ok(())
    }

    async fn presign_get(&self, key: &str, expires_in: Duration) -> Result<SignedUrl> {
        let presigning_config = PresigningConfig::expires_in(expires_in).map_err(|e| {
            PosterError::SigningFailed(format!("Failed to create presigning config: {}", e))
        })?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(|e| {
                PosterError::SigningFailed(format!("Failed to generate presigned URL: {}", e))
            })?;

        let expires_at = Utc::now() + expires_in;
        log::debug!("Generated presigned URL for {} expiring at {}", key, expires_at);

        Ok(SignedUrl {
            url: presigned.uri().to_string(),
            expires_in_secs: expires_in.as_secs(),
            expires_at,
        })
    }

    fn bucket(&self) -> &str {
        &self.bucket
    }
}
