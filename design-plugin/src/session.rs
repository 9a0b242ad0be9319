//! Plugin session.
//!
//! Owns the scene host for the lifetime of the plugin window and dispatches
//! UI messages to the render engine. The font cache lives as long as the
//! session, so fonts loaded by one render are reused by the next.

use design_core::{validate, Document, SchemaViolation, ViolationCode, SCHEMA_VERSION};
use design_renderer::{render, FontCache, RenderConfig, RenderError, RenderOutcome, SceneHost};
use serde_json::Value;

use crate::error::{PluginError, PluginResult};
use crate::message::{PluginMessage, PluginResponse};

/// Message handler bound to one host.
pub struct PluginSession<H: SceneHost> {
    host: H,
    fonts: FontCache,
    config: RenderConfig,
    closed: bool,
}

impl<H: SceneHost> PluginSession<H> {
    /// Create a session with the default render configuration.
    #[must_use]
    pub fn new(host: H) -> Self {
        Self::with_config(host, RenderConfig::default())
    }

    /// Create a session with a custom render configuration.
    #[must_use]
    pub fn with_config(host: H, config: RenderConfig) -> Self {
        Self {
            host,
            fonts: FontCache::new(),
            config,
            closed: false,
        }
    }

    /// The underlying host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Consume the session and return the host.
    #[must_use]
    pub fn into_host(self) -> H {
        self.host
    }

    /// Fonts resolved so far.
    #[must_use]
    pub fn fonts(&self) -> &FontCache {
        &self.fonts
    }

    /// Whether a `cancel` message closed the session.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Handle a raw JSON message from the UI.
    ///
    /// Messages that are not objects with a string `type` produce an error
    /// reply.
    pub async fn handle_json(&mut self, message: Value) -> Option<PluginResponse> {
        match serde_json::from_value::<PluginMessage>(message) {
            Ok(message) => self.handle(message).await,
            Err(e) => {
                tracing::warn!("Malformed plugin message: {}", e);
                (!self.closed).then(|| PluginResponse::error(format!("Invalid message: {e}")))
            }
        }
    }

    /// Handle one UI message.
    ///
    /// Returns the reply to post back, or `None` when the message needs no
    /// reply (`cancel`, unknown types, anything after the session closed).
    pub async fn handle(&mut self, message: PluginMessage) -> Option<PluginResponse> {
        if self.closed {
            tracing::debug!("Session closed, ignoring message");
            return None;
        }

        match message {
            PluginMessage::Render { payload } => Some(match self.render(&payload).await {
                Ok((name, outcome)) => {
                    for warning in &outcome.warnings {
                        tracing::warn!("{}", warning);
                    }
                    PluginResponse::success(format!("Design \"{name}\" created!"))
                }
                Err(e) => {
                    tracing::error!("Render error: {}", e);
                    PluginResponse::error(e.to_string())
                }
            }),
            PluginMessage::Cancel => {
                tracing::info!("Plugin closed");
                self.closed = true;
                None
            }
            PluginMessage::Unknown => {
                tracing::debug!("Ignoring unknown message type");
                None
            }
        }
    }

    /// Validate `payload` and render it.
    ///
    /// Returns the design name with the render outcome.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::MissingRoot`] or
    /// [`PluginError::UnsupportedSchemaVersion`] before validation,
    /// [`PluginError::InvalidDesign`] or an unknown node kind when validation
    /// fails, and [`PluginError::Render`] when the host rejects the render.
    pub async fn render(&mut self, payload: &Value) -> PluginResult<(String, RenderOutcome)> {
        let document = check(payload)?;
        let outcome = render(&mut self.host, &mut self.fonts, &self.config, &document).await?;
        Ok((document.meta.name, outcome))
    }
}

/// Structural checks, then full validation.
fn check(payload: &Value) -> PluginResult<Document> {
    if payload.get("root").map_or(true, Value::is_null) {
        return Err(PluginError::MissingRoot);
    }

    match payload.get("schemaVersion") {
        Some(Value::String(v)) if v == SCHEMA_VERSION => {}
        Some(Value::String(v)) => return Err(PluginError::UnsupportedSchemaVersion(v.clone())),
        Some(other) => return Err(PluginError::UnsupportedSchemaVersion(other.to_string())),
        None => return Err(PluginError::UnsupportedSchemaVersion("missing".to_string())),
    }

    validate(payload).map_err(|violations| {
        match unknown_kind(payload, &violations) {
            Some(kind) => PluginError::Render(RenderError::UnknownNodeKind(kind)),
            None => PluginError::InvalidDesign(violations),
        }
    })
}

/// The offending `type` value of the first unknown-kind violation.
fn unknown_kind(payload: &Value, violations: &[SchemaViolation]) -> Option<String> {
    let violation = violations
        .iter()
        .find(|v| v.code == ViolationCode::UnknownNodeKind)?;
    let pointer = format!("/{}", violation.path.replace('.', "/"));
    Some(
        payload
            .pointer(&pointer)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    )
}
