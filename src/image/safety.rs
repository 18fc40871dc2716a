//! Content-safety thresholds sent with every request.

use serde::{Deserialize, Serialize};

/// Categories of harmful content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HarmCategory {
    /// Harassment content.
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    /// Hate speech content.
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    /// Sexually explicit content.
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    /// Dangerous content.
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

/// Thresholds for blocking harmful content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HarmBlockThreshold {
    /// Block none.
    #[serde(rename = "BLOCK_NONE")]
    BlockNone,
    /// Block low and above.
    #[serde(rename = "BLOCK_LOW_AND_ABOVE")]
    BlockLowAndAbove,
    /// Block medium and above.
    #[serde(rename = "BLOCK_MEDIUM_AND_ABOVE")]
    BlockMediumAndAbove,
    /// Block only high.
    #[serde(rename = "BLOCK_ONLY_HIGH")]
    BlockOnlyHigh,
}

/// Threshold for one harm category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SafetySetting {
    /// The harm category to configure.
    pub category: HarmCategory,
    /// The blocking threshold for this category.
    pub threshold: HarmBlockThreshold,
}

/// The set of thresholds attached to every request a provider sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafetyPolicy {
    settings: Vec<SafetySetting>,
}

impl SafetyPolicy {
    /// Blocks only high-severity content in all four categories.
    ///
    /// The default thresholds reject many harmless non-English prompts.
    pub fn relaxed() -> Self {
        Self::uniform(HarmBlockThreshold::BlockOnlyHigh)
    }

    /// Applies one threshold to all four categories.
    pub fn uniform(threshold: HarmBlockThreshold) -> Self {
        Self::from_settings(
            [
                HarmCategory::Harassment,
                HarmCategory::HateSpeech,
                HarmCategory::SexuallyExplicit,
                HarmCategory::DangerousContent,
            ]
            .into_iter()
            .map(|category| SafetySetting {
                category,
                threshold,
            }),
        )
    }

    /// Builds a policy from explicit settings.
    pub fn from_settings(settings: impl IntoIterator<Item = SafetySetting>) -> Self {
        Self {
            settings: settings.into_iter().collect(),
        }
    }

    /// Returns the per-category settings.
    pub fn settings(&self) -> &[SafetySetting] {
        &self.settings
    }
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        Self::relaxed()
    }
}
