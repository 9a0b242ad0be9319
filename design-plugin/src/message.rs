//! Messages exchanged between the plugin UI and the plugin runtime.
//!
//! Both directions are JSON objects tagged by `type`:
//!
//! ```text
//! UI → runtime   { "type": "render", "payload": <document> }
//!                { "type": "cancel" }
//! runtime → UI   { "type": "render-success", "message": "..." }
//!                { "type": "render-error",   "message": "..." }
//! ```

use serde::{Deserialize, Serialize};

/// A message sent by the plugin UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PluginMessage {
    /// Render a design document. The payload is untyped until validated.
    Render {
        /// Candidate document.
        #[serde(default)]
        payload: serde_json::Value,
    },
    /// Close the plugin.
    Cancel,
    /// Any other message type; ignored.
    #[serde(other)]
    Unknown,
}

/// A reply posted back to the plugin UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum PluginResponse {
    /// The design was rendered.
    RenderSuccess {
        /// User-facing confirmation.
        message: String,
    },
    /// The design could not be rendered.
    RenderError {
        /// User-facing reason.
        message: String,
    },
}

impl PluginResponse {
    /// Create a success reply.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::RenderSuccess {
            message: message.into(),
        }
    }

    /// Create an error reply.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::RenderError {
            message: message.into(),
        }
    }

    /// Whether this reply reports success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::RenderSuccess { .. })
    }

    /// The message text.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::RenderSuccess { message } | Self::RenderError { message } => message,
        }
    }
}
