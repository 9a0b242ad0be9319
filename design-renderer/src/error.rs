//! Renderer error types.

use thiserror::Error;

use crate::host::{FontName, HostError};

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that abort a render.
///
/// Font and image problems on individual nodes are not errors; they degrade
/// to the default font or the placeholder fill and are reported as
/// [`RenderWarning`](crate::RenderWarning)s.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The tree contains a node kind the engine cannot draw.
    #[error("Unknown node type: {0}")]
    UnknownNodeKind(String),

    /// Even the default font could not be loaded.
    #[error("Default font {font} unavailable: {source}")]
    DefaultFontUnavailable {
        /// The default font.
        font: FontName,
        /// Host failure.
        source: HostError,
    },

    /// The host rejected an operation.
    #[error("Host operation failed: {0}")]
    Host(#[from] HostError),
}
