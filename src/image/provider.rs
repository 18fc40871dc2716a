//! Image service trait.

use crate::error::Result;
use crate::image::types::{EditRequest, GeneratedImage, GenerationRequest};
use async_trait::async_trait;

/// A backend that can generate and edit images.
#[async_trait]
pub trait ImageService: Send + Sync {
    /// Generates an image from a text prompt.
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage>;

    /// Edits an existing image according to an instruction.
    async fn edit(&self, request: &EditRequest) -> Result<GeneratedImage>;

    /// Returns the name of this service for display.
    fn name(&self) -> &str;

    /// Checks if the service is reachable and authenticated.
    async fn health_check(&self) -> Result<()>;
}
