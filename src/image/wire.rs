//! `generateContent` request and response bodies.

use crate::image::safety::{SafetyPolicy, SafetySetting};
use crate::image::types::AspectRatio;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
    pub safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RequestContent {
    pub parts: Vec<RequestPart>,
}

/// A part in a request - either text or inline image data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageConfig {
    pub aspect_ratio: AspectRatio,
}

impl GenerateContentRequest {
    /// Text-only request with an aspect-ratio config.
    pub fn generate(prompt: String, aspect_ratio: AspectRatio, safety: &SafetyPolicy) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart::Text { text: prompt }],
            }],
            generation_config: Some(GenerationConfig {
                image_config: ImageConfig { aspect_ratio },
            }),
            safety_settings: safety.settings().to_vec(),
        }
    }

    /// Image part followed by the instruction; no generation config.
    pub fn edit(
        image_base64: String,
        mime_type: String,
        instruction: String,
        safety: &SafetyPolicy,
    ) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: Some(mime_type),
                            data: image_base64,
                        },
                    },
                    RequestPart::Text { text: instruction },
                ],
            }],
            generation_config: None,
            safety_settings: safety.settings().to_vec(),
        }
    }
}

/// Response from `generateContent`. Only the fields read by the extractor.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub(crate) candidates: Vec<Candidate>,
    #[serde(default)]
    pub(crate) prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResponsePart {
    #[serde(default)]
    pub inline_data: Option<InlineData>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}
