//! Input validation for untrusted request data.
//!
//! Request bodies and prompts are cleaned before use: raw control
//! characters become spaces, and prompts are trimmed and length-checked.

use thiserror::Error;

/// Maximum prompt length in characters, after cleaning.
pub const MAX_PROMPT_LEN: usize = 8_000;

/// Validation error types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The prompt is missing or blank.
    #[error("Prompt is required")]
    PromptRequired,
    /// The prompt exceeds [`MAX_PROMPT_LEN`].
    #[error("Prompt too long (max {MAX_PROMPT_LEN} characters)")]
    PromptTooLong,
}

/// Replace ASCII control characters (`0x00`–`0x1F`, `0x7F`) with spaces.
///
/// Applied to raw request bodies before JSON decoding, so clients that send
/// literal newlines or tabs inside JSON strings are still understood.
#[must_use]
pub fn replace_control_chars(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_control() { ' ' } else { c })
        .collect()
}

/// Clean a prompt: control characters become spaces, then trim.
#[must_use]
pub fn clean_prompt(prompt: &str) -> String {
    replace_control_chars(prompt).trim().to_string()
}

/// Clean and check a prompt.
///
/// # Errors
///
/// Returns [`ValidationError::PromptRequired`] when the prompt is absent or
/// blank, and [`ValidationError::PromptTooLong`] when it exceeds
/// [`MAX_PROMPT_LEN`] characters.
pub fn validate_prompt(prompt: Option<&str>) -> Result<String, ValidationError> {
    let cleaned = clean_prompt(prompt.unwrap_or_default());
    if cleaned.is_empty() {
        return Err(ValidationError::PromptRequired);
    }
    if cleaned.chars().count() > MAX_PROMPT_LEN {
        return Err(ValidationError::PromptTooLong);
    }
    Ok(cleaned)
}
