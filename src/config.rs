use crate::error::{PosterError, Result};
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_MODEL_ID: &str = "amazon.titan-image-generator-v2:0";
pub const DEFAULT_BUCKET: &str = "movie-poster-design-0101-abc";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Lifetime of every signed download link.
pub const PRESIGNED_URL_EXPIRY_SECS: u64 = 3600;

/// Fixed settings sent with every generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    pub task_type: String,
    pub number_of_images: u32,
    pub height: u32,
    pub width: u32,
    pub cfg_scale: f32,
    pub seed: u32,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        GenerationParameters {
            task_type: "TEXT_IMAGE".to_string(),
            number_of_images: 1,
            height: 512,
            width: 512,
            cfg_scale: 8.0,
            seed: 0,
        }
    }
}

impl GenerationParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut params = Self::default();
        if let Some(height) = parse_var(&lookup, "POSTER_IMAGE_HEIGHT")? {
            params.height = height;
        }
        if let Some(width) = parse_var(&lookup, "POSTER_IMAGE_WIDTH")? {
            params.width = width;
        }
        if let Some(cfg_scale) = parse_var(&lookup, "POSTER_CFG_SCALE")? {
            params.cfg_scale = cfg_scale;
        }
        if let Some(seed) = parse_var(&lookup, "POSTER_SEED")? {
            params.seed = seed;
        }
        Ok(params)
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_cfg_scale(mut self, cfg_scale: f32) -> Self {
        self.cfg_scale = cfg_scale;
        self
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }
}

#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub model_id: String,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        BedrockConfig {
            region: None,
            access_key: None,
            secret_key: None,
            model_id: DEFAULT_MODEL_ID.to_string(),
        }
    }
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        BedrockConfig {
            region: lookup("AWS_REGION").or_else(|| lookup("AWS_DEFAULT_REGION")),
            access_key: lookup("AWS_ACCESS_KEY_ID"),
            secret_key: lookup("AWS_SECRET_ACCESS_KEY"),
            model_id: lookup("POSTER_MODEL_ID").unwrap_or_else(|| DEFAULT_MODEL_ID.to_string()),
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig {
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }
}

impl StorageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        StorageConfig {
            bucket: lookup("POSTER_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub port: Option<u16>,
    pub bedrock: BedrockConfig,
    pub storage: StorageConfig,
    pub generation: GenerationParameters,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            port: parse_var(&lookup, "PORT")?,
            bedrock: BedrockConfig::from_lookup(&lookup),
            storage: StorageConfig::from_lookup(&lookup),
            generation: GenerationParameters::from_lookup(&lookup)?,
        })
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_bedrock(mut self, config: BedrockConfig) -> Self {
        self.bedrock = config;
        self
    }

    pub fn with_storage(mut self, config: StorageConfig) -> Self {
        self.storage = config;
        self
    }

    pub fn with_generation(mut self, params: GenerationParameters) -> Self {
        self.generation = params;
        self
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| {
                PosterError::ConfigError(format!("{} has invalid value '{}': {}", key, raw, e))
            }),
        None => Ok(None),
    }
}
