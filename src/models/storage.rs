use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const PNG_CONTENT_TYPE: &str = "image/png";

/// A decoded poster ready to be written to the object store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredImage {
    pub key: String,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl StoredImage {
    pub fn png(key: impl Into<String>, bytes: Vec<u8>) -> Self {
        StoredImage {
            key: key.into(),
            bytes,
            content_type: PNG_CONTENT_TYPE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedUrl {
    pub url: String,
    pub expires_in_secs: u64,
    pub expires_at: DateTime<Utc>,
}
