use crate::error::PosterError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PosterResponse {
    pub status_code: u16,
    pub body: String,
}

impl PosterResponse {
    pub fn ok(url: impl Into<String>) -> Self {
        PosterResponse {
            status_code: 200,
            body: url.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

impl From<&PosterError> for PosterResponse {
    fn from(error: &PosterError) -> Self {
        PosterResponse {
            status_code: error.status_code(),
            body: error.to_string(),
        }
    }
}
