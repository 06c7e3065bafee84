//! Prompt composition: layers the fixed cover directive, the user's prompt,
//! optional hints and the negative-prompt section into one provider prompt.

use crate::error::CoverError;
use crate::params::{Mode, DEFAULT_ASPECT_RATIO};
use crate::ports::GenerationRequest;

/// Fixed directive prepended to every prompt.
pub const SYSTEM_DIRECTIVE: &str = "Generate a single WeChat Red Envelope Cover image (微信红包封面).

CRITICAL REQUIREMENTS:
- Output exactly ONE complete image, no variations or multiple outputs
- The image MUST fill the entire canvas with NO white space, NO margins, NO borders
- Full-bleed design that extends to all edges
- Vertical orientation optimized for mobile red envelope display

Design requirements:
- Festive, celebratory, and auspicious atmosphere
- Chinese cultural celebration themes (Spring Festival, New Year, birthdays, weddings)
- Vibrant colors: red, gold, warm tones as primary palette
- Traditional Chinese elements: lanterns, auspicious clouds, flowers, lucky symbols, koi fish, dragons, phoenixes
- Professional quality illustration suitable for WeChat red envelope cover
- Rich details filling the entire composition
- Modern aesthetic with traditional Chinese touches
- Safe for all ages

Composition:
- Design fills 100% of the canvas
- No empty space or blank areas
- Background extends to all edges
- Decorative elements reach the borders";

/// Baseline negative prompt, always present in the `Avoid:` section.
pub const BASE_NEGATIVE_PROMPT: &str = "white space, blank areas, margins, borders, empty background, white background, multiple images, image variations, blurry, low quality, distorted, inappropriate content, violence, gore, nudity, offensive symbols, text, letters, words, watermark, signature, poorly drawn, cropped, partial image";

/// Format line appended in avatar mode.
pub const AVATAR_FORMAT_LINE: &str = "Format: 3D avatar style character illustration";

/// Message returned when the prompt is missing.
pub const PROMPT_REQUIRED: &str = "Prompt is required";

const USER_REQUEST_LABEL: &str = "User request: ";
const AVOID_LABEL: &str = "\n\nAvoid: ";

/// Combine the baseline negative prompt with the caller's, if any.
#[must_use]
pub fn combined_negative_prompt(user: Option<&str>) -> String {
    match user.filter(|s| !s.is_empty()) {
        Some(extra) => format!("{BASE_NEGATIVE_PROMPT}, {extra}"),
        None => BASE_NEGATIVE_PROMPT.to_string(),
    }
}

/// Build the provider prompt for a request.
///
/// # Errors
///
/// Returns [`CoverError::Validation`] if the prompt is empty.
pub fn compose_prompt(request: &GenerationRequest) -> Result<String, CoverError> {
    if request.prompt.is_empty() {
        return Err(CoverError::Validation(PROMPT_REQUIRED.to_string()));
    }

    let mut prompt = format!("{SYSTEM_DIRECTIVE}\n\n{USER_REQUEST_LABEL}{}", request.prompt);

    if let Some(style) = request.style.as_deref().filter(|s| !s.is_empty()) {
        prompt.push_str("\nStyle: ");
        prompt.push_str(style);
    }
    if request.mode == Mode::Avatar {
        prompt.push('\n');
        prompt.push_str(AVATAR_FORMAT_LINE);
    }

    prompt.push_str(AVOID_LABEL);
    prompt.push_str(&combined_negative_prompt(request.negative_prompt.as_deref()));
    Ok(prompt)
}

/// The caller-supplied part of a composed prompt: the user request with any
/// style and format lines, minus the directive and the "Avoid:" section.
#[must_use]
pub fn user_section(composed: &str) -> &str {
    let rest = composed.split_once(USER_REQUEST_LABEL).map_or(composed, |(_, rest)| rest);
    rest.rsplit_once(AVOID_LABEL).map_or(rest, |(head, _)| head)
}

/// Aspect ratio to send to the provider.
#[must_use]
pub fn effective_aspect_ratio(request: &GenerationRequest) -> &str {
    request.aspect_ratio.as_deref().filter(|s| !s.is_empty()).unwrap_or(DEFAULT_ASPECT_RATIO)
}
