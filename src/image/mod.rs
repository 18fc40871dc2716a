//! Image generation and editing.

pub mod extract;
mod provider;
pub mod providers;
pub mod safety;
mod types;
mod wire;

pub use extract::extract_image;
pub use provider::ImageService;
pub use safety::{HarmBlockThreshold, HarmCategory, SafetyPolicy, SafetySetting};
pub use types::{
    download_file_name, AspectRatio, EditRequest, GeneratedImage, GenerationRequest, ImageFormat,
    Mode,
};
pub use wire::GenerateContentResponse;
