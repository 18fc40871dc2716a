#![warn(missing_docs)]
//! ReelMind - text-to-image generation and natural-language image editing.
//!
//! Prompts are enhanced with fixed style directives (and with an exact-text
//! block when they quote `「…」` or `“…”`), sent to Gemini together with a
//! relaxed safety policy, and the first inline image of the answer is
//! returned as a data URI.
//!
//! # Generate
//!
//! ```no_run
//! use reelmind::{AspectRatio, GeminiProvider, GenerationRequest, ImageService};
//!
//! #[tokio::main]
//! async fn main() -> reelmind::Result<()> {
//!     let provider = GeminiProvider::builder().build()?;
//!     let request = GenerationRequest::new("A night market with a sign reading 「夜市」")
//!         .with_aspect_ratio(AspectRatio::Landscape);
//!     let image = provider.generate(&request).await?;
//!     image.save(image.download_file_name())?;
//!     Ok(())
//! }
//! ```
//!
//! # Edit
//!
//! ```no_run
//! use reelmind::{EditRequest, GeminiProvider, ImageService};
//!
//! #[tokio::main]
//! async fn main() -> reelmind::Result<()> {
//!     let provider = GeminiProvider::builder().build()?;
//!     let bytes = std::fs::read("photo.jpg")?;
//!     let request = EditRequest::from_bytes(&bytes, "Make it snow");
//!     let image = provider.edit(&request).await?;
//!     println!("{}", image.url());
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `cli`: the `reelmind` command-line interface

pub mod data_uri;
mod error;
pub mod image;
pub mod prompt;
pub mod studio;

pub use data_uri::DataUri;
pub use error::{ErrorKind, ReelMindError, Result};
pub use image::providers::{GeminiModel, GeminiProvider, GeminiProviderBuilder};
pub use image::{
    AspectRatio, EditRequest, GeneratedImage, GenerationRequest, ImageFormat, ImageService, Mode,
    SafetyPolicy,
};
pub use studio::{LoadingState, Studio};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{ReelMindError, Result};
    pub use crate::image::providers::GeminiProvider;
    pub use crate::image::{
        AspectRatio, EditRequest, GeneratedImage, GenerationRequest, ImageService, Mode,
    };
    pub use crate::studio::Studio;
}
