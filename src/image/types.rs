//! Core types for image generation and editing.

use crate::data_uri::{DataUri, DEFAULT_MIME_TYPE};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// What a request does with its prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Create a new image from text.
    #[default]
    Generate,
    /// Modify an uploaded image.
    Edit,
}

impl Mode {
    /// Returns the mode name used in file names and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generate => "generate",
            Self::Edit => "edit",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format.
    WebP,
}

impl ImageFormat {
    /// Returns the file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Maps a MIME type back to a format.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.to_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// The five aspect ratios the generate path accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    /// 1:1 square.
    #[default]
    #[serde(rename = "1:1")]
    Square,
    /// 16:9 landscape.
    #[serde(rename = "16:9")]
    Landscape,
    /// 9:16 portrait.
    #[serde(rename = "9:16")]
    Portrait,
    /// 3:4 vertical.
    #[serde(rename = "3:4")]
    StandardPortrait,
    /// 4:3 horizontal.
    #[serde(rename = "4:3")]
    Standard,
}

impl AspectRatio {
    /// All supported ratios, in menu order.
    pub const ALL: [AspectRatio; 5] = [
        Self::Square,
        Self::Landscape,
        Self::Portrait,
        Self::StandardPortrait,
        Self::Standard,
    ];

    /// Returns the aspect ratio as a string (e.g., "16:9").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
            Self::StandardPortrait => "3:4",
            Self::Standard => "4:3",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AspectRatio {
    type Err = crate::error::ReelMindError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| {
                crate::error::ReelMindError::InvalidRequest(format!(
                    "unsupported aspect ratio `{s}`"
                ))
            })
    }
}

/// A request to generate an image from text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The raw text prompt describing the desired image.
    pub prompt: String,
    /// Output aspect ratio.
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
}

impl GenerationRequest {
    /// Creates a new request with the given prompt and a square aspect ratio.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: AspectRatio::default(),
        }
    }

    /// Sets the aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: AspectRatio) -> Self {
        self.aspect_ratio = ratio;
        self
    }
}

/// A request to edit an existing image with a natural-language instruction.
#[derive(Debug, Clone)]
pub struct EditRequest {
    /// Base64 image payload, optionally with a `data:` header.
    pub source_image: String,
    /// MIME type of the source image.
    pub mime_type: String,
    /// The raw editing instruction.
    pub instruction: String,
}

impl EditRequest {
    /// Creates a request from a base64 payload or data URI.
    pub fn new(
        source_image: impl Into<String>,
        mime_type: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            source_image: source_image.into(),
            mime_type: mime_type.into(),
            instruction: instruction.into(),
        }
    }

    /// Creates a request from raw image bytes, detecting the MIME type.
    pub fn from_bytes(bytes: &[u8], instruction: impl Into<String>) -> Self {
        let mime_type = ImageFormat::from_magic_bytes(bytes)
            .map(|f| f.mime_type())
            .unwrap_or(DEFAULT_MIME_TYPE);
        let uri = DataUri::from_bytes(mime_type, bytes);
        Self::new(uri.base64_data(), uri.mime_type(), instruction)
    }

    /// The MIME type to send: the explicit one, else [`DEFAULT_MIME_TYPE`].
    pub fn effective_mime_type(&self) -> &str {
        if self.mime_type.trim().is_empty() {
            DEFAULT_MIME_TYPE
        } else {
            &self.mime_type
        }
    }
}

/// A generated or edited image, with the caller's bookkeeping attached.
#[derive(Debug, Clone)]
#[must_use = "generated image should be saved or processed"]
pub struct GeneratedImage {
    /// Identifier for UI bookkeeping (the creation timestamp).
    pub id: String,
    /// The image as a data URI.
    pub image: DataUri,
    /// The raw prompt the user typed.
    pub prompt: String,
    /// Creation time in milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Whether this came from generate or edit.
    pub mode: Mode,
}

impl GeneratedImage {
    /// Wraps an extracted image, stamping it with the current time.
    pub fn new(image: DataUri, prompt: impl Into<String>, mode: Mode) -> Self {
        let timestamp = now_millis();
        Self {
            id: timestamp.to_string(),
            image,
            prompt: prompt.into(),
            timestamp,
            mode,
        }
    }

    /// Returns the image as a `data:` URL.
    pub fn url(&self) -> String {
        self.image.to_string()
    }

    /// Returns the format named by the MIME type, if recognized.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_mime_type(self.image.mime_type())
    }

    /// Decodes the image bytes.
    pub fn bytes(&self) -> Result<Vec<u8>> {
        self.image.decode()
    }

    /// Decodes and saves the image to the specified path.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.bytes()?)?;
        Ok(())
    }

    /// Returns the default download file name for this image.
    pub fn download_file_name(&self) -> String {
        download_file_name(self.mode, self.timestamp)
    }
}

/// Builds the download file name `reelmind-<mode>-<timestamp>.png`.
pub fn download_file_name(mode: Mode, timestamp: u64) -> String {
    format!("reelmind-{}-{}.png", mode.as_str(), timestamp)
}

/// Current time in milliseconds since the Unix epoch.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 12] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const JPEG_MAGIC: [u8; 12] = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0, 0, 0, 0, 0, 0, 0];
    const WEBP_MAGIC: [u8; 12] = *b"RIFF\x00\x00\x00\x00WEBP";

    #[test]
    fn test_format_from_magic_bytes() {
        assert_eq!(
            ImageFormat::from_magic_bytes(&PNG_MAGIC),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&JPEG_MAGIC),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(
            ImageFormat::from_magic_bytes(&WEBP_MAGIC),
            Some(ImageFormat::WebP)
        );
        assert_eq!(ImageFormat::from_magic_bytes(b"GIF89a"), None);
    }

    #[test]
    fn test_format_from_mime_type() {
        assert_eq!(ImageFormat::from_mime_type("image/PNG"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_mime_type("image/gif"), None);
    }

    #[test]
    fn test_aspect_ratio_round_trips_through_str() {
        for ratio in AspectRatio::ALL {
            assert_eq!(ratio.as_str().parse::<AspectRatio>().unwrap(), ratio);
        }
        assert!("21:9".parse::<AspectRatio>().is_err());
        assert_eq!(AspectRatio::default(), AspectRatio::Square);
    }

    #[test]
    fn test_aspect_ratio_serializes_as_ratio() {
        let json = serde_json::to_string(&AspectRatio::Portrait).unwrap();
        assert_eq!(json, "\"9:16\"");
    }

    #[test]
    fn test_edit_request_from_bytes_detects_mime() {
        let req = EditRequest::from_bytes(&JPEG_MAGIC, "brighten");
        assert_eq!(req.mime_type, "image/jpeg");
        assert!(!req.source_image.starts_with("data:"));
    }

    #[test]
    fn test_edit_request_effective_mime_type() {
        assert_eq!(EditRequest::new("QUJD", "", "x").effective_mime_type(), "image/png");
        assert_eq!(
            EditRequest::new("QUJD", "image/webp", "x").effective_mime_type(),
            "image/webp"
        );
    }

    #[test]
    fn test_download_file_name() {
        assert_eq!(
            download_file_name(Mode::Edit, 1_700_000_000_000),
            "reelmind-edit-1700000000000.png"
        );
    }

    #[test]
    fn test_generated_image_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let image = GeneratedImage::new(DataUri::from_bytes("image/png", &PNG_MAGIC), "p", Mode::Generate);

        image.save(&path).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), PNG_MAGIC);
        assert_eq!(image.format(), Some(ImageFormat::Png));
        assert_eq!(image.id, image.timestamp.to_string());
        assert!(image.url().starts_with("data:image/png;base64,"));
    }
}
