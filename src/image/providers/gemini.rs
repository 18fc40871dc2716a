//! Gemini (Google) image provider.

use crate::data_uri::strip_data_uri_prefix;
use crate::error::{api_error_message, ReelMindError, Result};
use crate::image::extract::extract_image;
use crate::image::provider::ImageService;
use crate::image::safety::SafetyPolicy;
use crate::image::types::{EditRequest, GeneratedImage, GenerationRequest, Mode};
use crate::image::wire::{GenerateContentRequest, GenerateContentResponse};
use crate::prompt;
use async_trait::async_trait;

/// Production endpoint of the Generative Language API.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variables searched for an API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

/// Gemini image model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GeminiModel {
    /// Nano Banana - Gemini 2.5 Flash Image.
    #[default]
    NanoBanana,
    /// Nano Banana Pro - Gemini 3 Pro Image.
    NanoBananaPro,
}

impl GeminiModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NanoBanana => "gemini-2.5-flash-image",
            Self::NanoBananaPro => "gemini-3-pro-image-preview",
        }
    }
}

/// Builder for GeminiProvider.
#[derive(Debug, Clone, Default)]
pub struct GeminiProviderBuilder {
    api_key: Option<String>,
    model: GeminiModel,
    base_url: Option<String>,
    safety_policy: Option<SafetyPolicy>,
    client: Option<reqwest::Client>,
}

impl GeminiProviderBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key. Falls back to `GEMINI_API_KEY`, then `GOOGLE_API_KEY`.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the Gemini model variant.
    pub fn model(mut self, model: GeminiModel) -> Self {
        self.model = model;
        self
    }

    /// Overrides the API root, e.g. for a proxy or a mock server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Replaces the relaxed safety thresholds sent with every request.
    pub fn safety_policy(mut self, policy: SafetyPolicy) -> Self {
        self.safety_policy = Some(policy);
        self
    }

    /// Uses a preconfigured HTTP client.
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds the provider, resolving the API key.
    pub fn build(self) -> Result<GeminiProvider> {
        let api_key = self
            .api_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                API_KEY_ENV_VARS
                    .iter()
                    .find_map(|var| std::env::var(var).ok().filter(|k| !k.trim().is_empty()))
            })
            .ok_or_else(|| {
                ReelMindError::Auth(format!(
                    "{} not set and no API key provided",
                    API_KEY_ENV_VARS.join(" / ")
                ))
            })?;

        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(GeminiProvider {
            client: self.client.unwrap_or_default(),
            api_key,
            model: self.model,
            base_url,
            safety_policy: self.safety_policy.unwrap_or_default(),
        })
    }
}

/// Gemini image generation and editing provider.
pub struct GeminiProvider {
    client: reqwest::Client,
    api_key: String,
    model: GeminiModel,
    base_url: String,
    safety_policy: SafetyPolicy,
}

impl GeminiProvider {
    /// Creates a new `GeminiProviderBuilder`.
    pub fn builder() -> GeminiProviderBuilder {
        GeminiProviderBuilder::new()
    }

    /// Returns the model this provider calls.
    pub fn model(&self) -> GeminiModel {
        self.model
    }

    /// Returns the safety thresholds attached to every request.
    pub fn safety_policy(&self) -> &SafetyPolicy {
        &self.safety_policy
    }

    fn model_url(&self) -> String {
        format!("{}/v1beta/models/{}", self.base_url, self.model.as_str())
    }

    async fn generate_impl(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        let enhanced = prompt::enhance(&request.prompt, Mode::Generate);
        tracing::debug!(
            model = self.model.as_str(),
            aspect_ratio = %request.aspect_ratio,
            prompt_len = enhanced.len(),
            "dispatching Gemini generate request"
        );

        let body =
            GenerateContentRequest::generate(enhanced, request.aspect_ratio, &self.safety_policy);
        let response = self.send(&body).await?;
        self.finish(&response, &request.prompt, Mode::Generate)
    }

    async fn edit_impl(&self, request: &EditRequest) -> Result<GeneratedImage> {
        let image = strip_data_uri_prefix(&request.source_image);
        if image.is_empty() {
            return Err(ReelMindError::InvalidRequest(
                "source image payload is empty".into(),
            ));
        }

        let enhanced = prompt::enhance(&request.instruction, Mode::Edit);
        tracing::debug!(
            model = self.model.as_str(),
            mime_type = request.effective_mime_type(),
            image_len = image.len(),
            prompt_len = enhanced.len(),
            "dispatching Gemini edit request"
        );

        let body = GenerateContentRequest::edit(
            image.to_string(),
            request.effective_mime_type().to_string(),
            enhanced,
            &self.safety_policy,
        );
        let response = self.send(&body).await?;
        self.finish(&response, &request.instruction, Mode::Edit)
    }

    async fn send(&self, body: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let url = format!("{}:generateContent", self.model_url());

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(parse_error(status.as_u16(), &text));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn finish(
        &self,
        response: &GenerateContentResponse,
        prompt: &str,
        mode: Mode,
    ) -> Result<GeneratedImage> {
        match extract_image(response) {
            Ok(image) => {
                tracing::debug!(
                    %mode,
                    mime_type = image.mime_type(),
                    payload_len = image.base64_data().len(),
                    "Gemini returned an image"
                );
                Ok(GeneratedImage::new(image, prompt, mode))
            }
            Err(e) => {
                tracing::warn!(%mode, "Gemini returned no image: {e}");
                Err(e)
            }
        }
    }
}

fn parse_error(status: u16, text: &str) -> ReelMindError {
    let message = api_error_message(text);
    match status {
        401 | 403 => ReelMindError::Auth(message),
        _ => ReelMindError::Api { status, message },
    }
}

#[async_trait]
impl ImageService for GeminiProvider {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage> {
        self.generate_impl(request).await
    }

    async fn edit(&self, request: &EditRequest) -> Result<GeneratedImage> {
        self.edit_impl(request).await
    }

    fn name(&self) -> &str {
        "Gemini (Google)"
    }

    async fn health_check(&self) -> Result<()> {
        let response = self
            .client
            .get(self.model_url())
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        match response.status().as_u16() {
            401 | 403 => Err(ReelMindError::Auth("Invalid API key".into())),
            404 => Err(ReelMindError::InvalidRequest(
                "Model not found. Verify the model name is correct.".into(),
            )),
            s if !(200..300).contains(&s) => Err(ReelMindError::Api {
                status: s,
                message: "Health check failed".into(),
            }),
            _ => Ok(()),
        }
    }
}
