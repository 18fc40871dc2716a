//! Prompt enhancement.
//!
//! Raw user prompts are wrapped with fixed style directives before they are
//! sent to the model. Text quoted with `「…」` or `“…”` is treated as literal
//! text that must appear verbatim in the image (signs, titles, captions).

use crate::image::Mode;
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches the first `「…」` or `“…”` span.
static LITERAL_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"「([^」]+)」|“([^”]+)”").expect("valid literal text pattern"));

/// Heading of the literal-text block. Present only when a quoted span was found.
pub const LITERAL_TEXT_HEADING: &str = "[Exact text rendering]";

const GENERATE_DIRECTIVES: &str = "[Style]\n\
Photorealistic, ultra-detailed, 8K resolution, sharp focus.\n\
Cinematic, physically plausible lighting with natural shadows and depth.";

const GENERATE_STROKE_DIRECTIVE: &str = "Every character of the quoted text must have correct, \
complete strokes. Do not invent, drop, or substitute characters.";

const EDIT_DIRECTIVES: &str = "[Editing rules]\n\
Preserve the original image's perspective, lighting, color temperature, and composition.\n\
Apply only the requested change and blend it seamlessly so it looks native to the original photo.";

/// Returns the inner text of the first quoted span, if any.
///
/// Only the first span is honored; later spans stay in the prompt as plain text.
pub fn literal_text(prompt: &str) -> Option<&str> {
    let caps = LITERAL_TEXT.captures(prompt)?;
    caps.get(1).or_else(|| caps.get(2)).map(|m| m.as_str())
}

/// Wraps a raw prompt with the directives for `mode`.
pub fn enhance(raw_prompt: &str, mode: Mode) -> String {
    let raw_prompt = raw_prompt.trim();
    let literal = literal_text(raw_prompt);

    let mut sections = vec![raw_prompt.to_string()];

    if let Some(text) = literal {
        sections.push(format!(
            "{LITERAL_TEXT_HEADING}\n\
             The image must clearly display this exact text: \"{text}\".\n\
             Render it exactly as written, legibly and prominently, \
             like lettering on a sign or a title card. Do not translate or paraphrase it."
        ));
    }

    match mode {
        Mode::Generate => {
            let mut directives = GENERATE_DIRECTIVES.to_string();
            if literal.is_some() {
                directives.push('\n');
                directives.push_str(GENERATE_STROKE_DIRECTIVE);
            }
            sections.push(directives);
        }
        Mode::Edit => sections.push(EDIT_DIRECTIVES.to_string()),
    }

    sections.join("\n\n")
}
