use crate::error::{PosterError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosterRequest {
    pub prompt: String,
}

impl PosterRequest {
    /// Pulls the prompt out of an invocation event. Only its presence is checked.
    pub fn from_event(event: &Value) -> Result<Self> {
        let prompt = event
            .get("prompt")
            .ok_or_else(|| PosterError::InvalidInput("missing field 'prompt'".into()))?;

        match prompt {
            Value::String(text) => Ok(PosterRequest {
                prompt: text.clone(),
            }),
            other => Err(PosterError::InvalidInput(format!(
                "field 'prompt' must be a string, got {}",
                other
            ))),
        }
    }
}
