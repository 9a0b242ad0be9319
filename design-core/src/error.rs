//! Error types for the document pipeline.

use thiserror::Error;

use crate::validate::SchemaViolation;

/// Result type for pipeline operations.
pub type DesignResult<T> = Result<T, DesignError>;

/// Why raw generator output could not be turned into a [`Document`](crate::Document).
///
/// Both variants are retryable from the orchestrator's point of view.
#[derive(Debug, Error)]
pub enum DesignError {
    /// The text is not decodable JSON (after fence stripping).
    #[error("Invalid JSON format: {0}")]
    Parse(#[from] serde_json::Error),

    /// The JSON decoded but violates the schema.
    #[error("Schema validation failed: {}", join_violations(.0))]
    Schema(Vec<SchemaViolation>),
}

impl DesignError {
    /// Path-qualified messages suitable for a corrective prompt or an API
    /// error payload.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Parse(e) => vec![format!("Invalid JSON format: {e}")],
            Self::Schema(violations) => violations.iter().map(ToString::to_string).collect(),
        }
    }

    /// The schema violations, if this is a schema failure.
    #[must_use]
    pub fn violations(&self) -> &[SchemaViolation] {
        match self {
            Self::Parse(_) => &[],
            Self::Schema(violations) => violations,
        }
    }
}

fn join_violations(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::ViolationCode;

    #[test]
    fn test_parse_error_messages() {
        let err = DesignError::from(
            serde_json::from_str::<serde_json::Value>("{ nope").expect_err("invalid json"),
        );
        let messages = err.messages();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Invalid JSON format"));
        assert!(err.violations().is_empty());
    }

    #[test]
    fn test_schema_error_messages_keep_paths() {
        let err = DesignError::Schema(vec![SchemaViolation::new(
            "root.text.typography.family",
            ViolationCode::InvalidEnum,
            "invalid enum value",
        )]);
        assert_eq!(
            err.messages(),
            vec!["root.text.typography.family: invalid enum value".to_string()]
        );
        assert!(err.to_string().contains("root.text.typography.family"));
    }
}
