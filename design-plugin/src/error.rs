//! Error types for the plugin surface.

use design_core::SchemaViolation;
use design_renderer::RenderError;
use thiserror::Error;

/// Result type for plugin operations.
pub type PluginResult<T> = Result<T, PluginError>;

/// Reasons a `render` message is rejected.
#[derive(Debug, Error)]
pub enum PluginError {
    /// The payload has no `root` node.
    #[error("Invalid design: missing root node")]
    MissingRoot,

    /// The payload declares a schema version other than the supported one.
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(String),

    /// The payload failed validation.
    #[error("Invalid design: {}", join(.0))]
    InvalidDesign(Vec<SchemaViolation>),

    /// Rendering failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

fn join(violations: &[SchemaViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
