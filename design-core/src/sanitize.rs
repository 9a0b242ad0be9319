//! Best-effort repair of untrusted generator output.
//!
//! The sanitizer runs on the untyped JSON value before validation. It fills
//! in fields the generator routinely forgets and repairs near-valid colors,
//! so that trivial omissions do not cost a corrective round trip. It never
//! fails: anything it cannot repair is left for the validator to reject.
//!
//! The caller's value is never touched; [`Sanitizer::sanitize`] works on a
//! deep copy.

use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use crate::color::{self, Color};
use crate::defaults::{
    DEFAULT_DESIGN_NAME, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE, DEFAULT_FONT_WEIGHT,
    DESKTOP_CANVAS,
};
use crate::document::{NodeType, SizingMode, SCHEMA_VERSION};

/// A color that had to be replaced by the fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizeWarning {
    /// Dotted path of the field.
    pub path: String,
    /// The value the generator emitted.
    pub original: String,
    /// The value written instead.
    pub replacement: Color,
}

impl fmt::Display for SanitizeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: invalid color \"{}\" replaced with {}",
            self.path, self.original, self.replacement
        )
    }
}

/// Output of a sanitize pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Sanitized {
    /// The repaired copy.
    pub value: Value,
    /// Colors that were substituted.
    pub warnings: Vec<SanitizeWarning>,
}

/// Repairs raw documents. Holds an optional fixed timestamp for tests.
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    generated_at: Option<String>,
}

impl Sanitizer {
    /// Sanitizer stamping missing `meta.generatedAt` with the current time.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sanitizer stamping missing `meta.generatedAt` with a fixed value.
    #[must_use]
    pub fn with_timestamp(generated_at: impl Into<String>) -> Self {
        Self {
            generated_at: Some(generated_at.into()),
        }
    }

    /// Repair a deep copy of `raw`.
    #[must_use]
    pub fn sanitize(&self, raw: &Value) -> Sanitized {
        let mut value = raw.clone();
        let mut warnings = Vec::new();

        if let Value::Object(doc) = &mut value {
            self.fill_document(doc);

            if let Some(Value::Object(tokens)) = doc.get_mut("tokens") {
                if let Some(Value::Object(colors)) = tokens.get_mut("colors") {
                    for (name, color) in colors.iter_mut() {
                        fix_color(color, &format!("tokens.colors.{name}"), &mut warnings);
                    }
                }
            }

            if let Some(root) = doc.get_mut("root") {
                sanitize_node(root, "root", &mut warnings);
            }
        }

        for warning in &warnings {
            tracing::warn!("{}", warning);
        }

        Sanitized { value, warnings }
    }

    fn timestamp(&self) -> String {
        self.generated_at
            .clone()
            .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    fn fill_document(&self, doc: &mut Map<String, Value>) {
        if is_blank(doc.get("schemaVersion")) {
            doc.insert("schemaVersion".into(), json!(SCHEMA_VERSION));
        }

        if is_blank(doc.get("meta")) {
            doc.insert("meta".into(), json!({}));
        }
        if let Some(Value::Object(meta)) = doc.get_mut("meta") {
            if is_blank(meta.get("name")) {
                meta.insert("name".into(), json!(DEFAULT_DESIGN_NAME));
            }
            if is_blank(meta.get("generatedAt")) {
                meta.insert("generatedAt".into(), json!(self.timestamp()));
            }
        }

        if is_blank(doc.get("canvas")) {
            doc.insert("canvas".into(), json!({}));
        }
        if let Some(Value::Object(canvas)) = doc.get_mut("canvas") {
            if is_blank(canvas.get("width")) {
                canvas.insert("width".into(), json!(DESKTOP_CANVAS.width));
            }
            if is_blank(canvas.get("height")) {
                canvas.insert("height".into(), json!(DESKTOP_CANVAS.height));
            }
        }
    }
}

/// Repair `raw` with a sanitizer using the current time.
#[must_use]
pub fn sanitize(raw: &Value) -> Sanitized {
    Sanitizer::new().sanitize(raw)
}

/// Missing, null, or an empty string.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

fn sanitize_node(node: &mut Value, path: &str, warnings: &mut Vec<SanitizeWarning>) {
    let Value::Object(node) = node else {
        return;
    };

    fix_node_colors(node, path, warnings);

    let kind = node
        .get("type")
        .and_then(Value::as_str)
        .and_then(NodeType::from_wire);
    match kind {
        Some(NodeType::Text) => fill_text_defaults(node),
        Some(NodeType::Frame | NodeType::Component | NodeType::Rectangle | NodeType::Image)
        | None => {}
    }

    if let Some(Value::Array(children)) = node.get_mut("children") {
        for (index, child) in children.iter_mut().enumerate() {
            sanitize_node(child, &format!("{path}.children.{index}"), warnings);
        }
    }
}

fn fill_text_defaults(node: &mut Map<String, Value>) {
    if is_blank(node.get("sizing")) {
        node.insert(
            "sizing".into(),
            json!({ "width": SizingMode::Hug.as_str(), "height": SizingMode::Hug.as_str() }),
        );
    }

    let typography = node
        .get_mut("text")
        .and_then(|text| text.get_mut("typography"));
    if let Some(Value::Object(typography)) = typography {
        if is_blank(typography.get("family")) {
            typography.insert("family".into(), json!(DEFAULT_FONT_FAMILY.as_str()));
        }
        if is_blank(typography.get("weight")) {
            typography.insert("weight".into(), json!(DEFAULT_FONT_WEIGHT.as_str()));
        }
        let size_missing = match typography.get("size") {
            Some(Value::Number(n)) => n.as_f64() == Some(0.0),
            other => is_blank(other),
        };
        if size_missing {
            typography.insert("size".into(), json!(DEFAULT_FONT_SIZE));
        }
    }
}

fn fix_node_colors(node: &mut Map<String, Value>, path: &str, warnings: &mut Vec<SanitizeWarning>) {
    if let Some(Value::Object(style)) = node.get_mut("style") {
        if let Some(Value::Object(fill)) = style.get_mut("fill") {
            if let Some(color) = fill.get_mut("color") {
                fix_color(color, &format!("{path}.style.fill.color"), warnings);
            }
            if let Some(Value::Array(stops)) = fill.get_mut("gradientStops") {
                for (index, stop) in stops.iter_mut().enumerate() {
                    if let Some(color) = stop.get_mut("color") {
                        fix_color(
                            color,
                            &format!("{path}.style.fill.gradientStops.{index}.color"),
                            warnings,
                        );
                    }
                }
            }
        }
        for effect in ["stroke", "shadow"] {
            if let Some(color) = style.get_mut(effect).and_then(|e| e.get_mut("color")) {
                fix_color(color, &format!("{path}.style.{effect}.color"), warnings);
            }
        }
    }

    if let Some(color) = node.get_mut("text").and_then(|t| t.get_mut("color")) {
        fix_color(color, &format!("{path}.text.color"), warnings);
    }
}

/// Normalize a color string in place. Non-string values are left for the
/// validator.
fn fix_color(value: &mut Value, path: &str, warnings: &mut Vec<SanitizeWarning>) {
    let Value::String(raw) = value else {
        return;
    };

    let normalized = color::normalize(raw);
    if normalized.substituted {
        warnings.push(SanitizeWarning {
            path: path.to_string(),
            original: raw.clone(),
            replacement: normalized.color.clone(),
        });
    }
    *value = Value::String(normalized.color.into());
}
