use thiserror::Error;

#[derive(Debug, Error)]
pub enum PosterError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Image generation failed: {0}")]
    GenerationFailed(String),
    #[error("Image decode failed: {0}")]
    DecodeFailed(String),
    #[error("Storage failed: {0}")]
    StorageFailed(String),
    #[error("URL signing failed: {0}")]
    SigningFailed(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl PosterError {
    /// Status code reported to the invoking trigger for this failure.
    pub fn status_code(&self) -> u16 {
        match self {
            PosterError::InvalidInput(_) => 400,
            PosterError::GenerationFailed(_) | PosterError::DecodeFailed(_) => 502,
            PosterError::StorageFailed(_)
            | PosterError::SigningFailed(_)
            | PosterError::ConfigError(_) => 500,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PosterError::InvalidInput(_) => "InvalidInput",
            PosterError::GenerationFailed(_) => "GenerationFailed",
            PosterError::DecodeFailed(_) => "DecodeFailed",
            PosterError::StorageFailed(_) => "StorageFailed",
            PosterError::SigningFailed(_) => "SigningFailed",
            PosterError::ConfigError(_) => "ConfigError",
        }
    }
}

impl From<base64::DecodeError> for PosterError {
    fn from(error: base64::DecodeError) -> Self {
        PosterError::DecodeFailed(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PosterError>;
