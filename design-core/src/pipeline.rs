//! Raw text to verified document.
//!
//! [`process`] chains the three steps every generator response goes through:
//! fence stripping and JSON decoding, sanitizing, and validation.

use serde_json::Value;

use crate::document::Document;
use crate::error::{DesignError, DesignResult};
use crate::sanitize::{SanitizeWarning, Sanitizer};
use crate::validate::validate;

/// A document that passed validation, plus any colors the sanitizer replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Verified {
    /// The typed document.
    pub document: Document,
    /// Sanitizer substitutions.
    pub warnings: Vec<SanitizeWarning>,
}

/// Remove a surrounding Markdown code fence, if any.
///
/// Strips one leading ```` ``` ```` or ```` ```json ```` marker and, only
/// after such an opening, one trailing ```` ``` ````. Text that does not open
/// with a fence is returned trimmed.
#[must_use]
pub fn strip_fence(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        text = rest.trim_start();
        if let Some(rest) = text.strip_suffix("```") {
            text = rest.trim_end();
        }
    }

    text
}

/// Strip an optional fence and decode JSON.
///
/// # Errors
///
/// Returns [`DesignError::Parse`] when the remaining text is not JSON.
pub fn parse_raw(raw: &str) -> DesignResult<Value> {
    Ok(serde_json::from_str(strip_fence(raw))?)
}

/// Turn raw generator text into a verified document.
///
/// # Errors
///
/// Returns [`DesignError::Parse`] for undecodable text and
/// [`DesignError::Schema`] with every violation for documents that do not
/// validate after sanitizing.
pub fn process(raw: &str) -> DesignResult<Verified> {
    process_with(&Sanitizer::new(), raw)
}

/// [`process`] with a caller-supplied sanitizer.
///
/// # Errors
///
/// Same as [`process`].
pub fn process_with(sanitizer: &Sanitizer, raw: &str) -> DesignResult<Verified> {
    let value = parse_raw(raw)?;
    let sanitized = sanitizer.sanitize(&value);
    let document = validate(&sanitized.value).map_err(DesignError::Schema)?;

    tracing::debug!(
        name = %document.meta.name,
        nodes = document.root.count(),
        substitutions = sanitized.warnings.len(),
        "Document verified"
    );

    Ok(Verified {
        document,
        warnings: sanitized.warnings,
    })
}
