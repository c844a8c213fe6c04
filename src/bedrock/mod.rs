pub mod image_client;

use crate::{
    config::{BedrockConfig, DEFAULT_REGION},
    error::{PosterError, Result},
    models::TitanImageRequest,
};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_bedrockruntime::config::{Credentials, Region};

pub use image_client::ImageClient;

/// Remote capability that turns a prompt into images.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Sends one generation request and returns the raw JSON response body.
    async fn invoke(&self, request: &TitanImageRequest) -> Result<Vec<u8>>;
}

/// Shared AWS configuration for the Bedrock and S3 clients.
///
/// Explicit credentials are used only when both keys are set, and then the
/// region falls back to `us-east-1`. Otherwise the default provider chain applies.
pub async fn load_sdk_config(bedrock_config: &BedrockConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let (Some(access_key), Some(secret_key)) =
        (&bedrock_config.access_key, &bedrock_config.secret_key)
    {
        log::debug!("Using explicit AWS credentials from configuration");
        loader = loader
            .credentials_provider(Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "postergen-config",
            ))
            .region(Region::new(
                bedrock_config
                    .region
                    .clone()
                    .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            ));
    } else if let Some(region) = &bedrock_config.region {
        loader = loader.region(Region::new(region.clone()));
    }

    loader.load().await
}

/// Fails when neither configuration nor the provider chain yielded a region.
pub fn require_region(sdk_config: &SdkConfig) -> Result<()> {
    match sdk_config.region() {
        Some(region) => {
            log::debug!("Using AWS region: {}", region);
            Ok(())
        }
        None => Err(PosterError::ConfigError(
            "no AWS region resolved, set AWS_REGION".into(),
        )),
    }
}
