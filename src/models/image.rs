use crate::config::GenerationParameters;
use serde::{Deserialize, Serialize};

/// Body of a Titan `TEXT_IMAGE` invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitanImageRequest {
    pub task_type: String,
    pub text_to_image_params: TextToImageParams,
    pub image_generation_config: ImageGenerationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextToImageParams {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationConfig {
    pub number_of_images: u32,
    pub height: u32,
    pub width: u32,
    pub cfg_scale: f32,
    pub seed: u32,
}

impl TitanImageRequest {
    pub fn new(prompt: impl Into<String>, params: &GenerationParameters) -> Self {
        TitanImageRequest {
            task_type: params.task_type.clone(),
            text_to_image_params: TextToImageParams {
                text: prompt.into(),
            },
            image_generation_config: ImageGenerationConfig {
                number_of_images: params.number_of_images,
                height: params.height,
                width: params.width,
                cfg_scale: params.cfg_scale,
                seed: params.seed,
            },
        }
    }

    pub fn prompt(&self) -> &str {
        &self.text_to_image_params.text
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TitanImageResponse {
    pub images: Vec<String>, // Base64 encoded
}
