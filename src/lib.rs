pub mod bedrock;
pub mod config;
pub mod error;
pub mod handler;
pub mod logger;
pub mod models;
#[cfg(feature = "server")]
pub mod server;
pub mod storage;

pub use bedrock::{ImageClient, ImageGenerator};
pub use config::{BedrockConfig, Config, GenerationParameters, StorageConfig};
pub use error::{PosterError, Result};
pub use handler::PosterHandler;
pub use models::{PosterRequest, PosterResponse, SignedUrl, StoredImage, TitanImageRequest};
pub use storage::{ObjectStore, S3Store};
