//! Pulls the image out of a `generateContent` response.

use crate::data_uri::DataUri;
use crate::error::{ReelMindError, Result};
use crate::image::wire::GenerateContentResponse;

/// Finish reasons that mean the candidate was stopped by a content filter.
const SAFETY_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "IMAGE_SAFETY",
    "PROHIBITED_CONTENT",
    "IMAGE_PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
];

/// Returns true if `reason` is a safety-filter finish reason.
pub fn is_safety_finish_reason(reason: &str) -> bool {
    SAFETY_FINISH_REASONS.contains(&reason)
}

/// Extracts the first inline image of the first candidate.
///
/// Checks run in a fixed order, and the first failing check decides the error:
/// no candidates, safety stop, inline data, text-only answer, nothing usable.
/// Inline parts with an empty payload are skipped.
pub fn extract_image(response: &GenerateContentResponse) -> Result<DataUri> {
    let candidate = response
        .candidates
        .first()
        .ok_or_else(|| ReelMindError::NoCandidates {
            block_reason: response
                .prompt_feedback
                .as_ref()
                .and_then(|f| f.block_reason.clone()),
        })?;

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if is_safety_finish_reason(reason) {
            return Err(ReelMindError::SafetyBlocked(reason.to_string()));
        }
    }

    let parts = candidate
        .content
        .as_ref()
        .map(|c| c.parts.as_slice())
        .unwrap_or_default();

    if let Some(inline) = parts
        .iter()
        .filter_map(|p| p.inline_data.as_ref())
        .find(|d| !d.data.is_empty())
    {
        let mime_type = inline.mime_type.clone().unwrap_or_default();
        return Ok(DataUri::new(mime_type, inline.data.clone()));
    }

    let text: Vec<&str> = parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if !text.is_empty() {
        return Err(ReelMindError::UnexpectedTextResponse(text.join("\n")));
    }

    Err(ReelMindError::NoImageData)
}
