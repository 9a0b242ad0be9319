//! Structural validation of sanitized documents.
//!
//! [`validate`] walks an untyped JSON value and either produces a typed
//! [`Document`] or reports every violation it found, each tagged with the
//! dotted path of the offending field (`root.children.2.text.typography.family`).
//! It does not stop at the first problem: the corrective prompt works best when
//! the generator sees all of them at once.
//!
//! Unknown keys are ignored, except node payload fields (`text`, `image`,
//! `children`, `componentKey`) appearing on a kind that does not carry them.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::color::Color;
use crate::document::{
    Canvas, ComponentNode, Document, Fill, FrameNode, GradientStop, ImageContent, ImageNode,
    LayoutConfig, Meta, Node, NodeProps, NodeStyle, NodeType, RectangleNode, Shadow,
    SizingConfig, Spacing, Stroke, TextContent, TextNode, Tokens, Typography, WireEnum,
    SCHEMA_VERSION,
};

/// Category of a schema violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    /// A required field is missing or null.
    Required,
    /// The field has the wrong JSON type.
    InvalidType,
    /// The field must equal a fixed literal.
    InvalidLiteral,
    /// The string is not one of the accepted values.
    InvalidEnum,
    /// A number is outside its allowed range.
    OutOfRange,
    /// An array has too few elements.
    TooFewItems,
    /// A color string is not `#RRGGBB` or `#RRGGBBAA`.
    InvalidColor,
    /// A node `type` outside the closed set of kinds.
    UnknownNodeKind,
    /// A payload field on a node kind that does not accept it.
    UnexpectedField,
}

/// One problem found by [`validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// Dotted path of the field.
    pub path: String,
    /// Category.
    pub code: ViolationCode,
    /// Human-readable message.
    pub message: String,
}

impl SchemaViolation {
    /// Create a violation.
    #[must_use]
    pub fn new(path: impl Into<String>, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Validate a sanitized value and build the typed document.
///
/// # Errors
///
/// Returns every violation found, in document order.
pub fn validate(value: &Value) -> Result<Document, Vec<SchemaViolation>> {
    let mut walker = Walker::default();
    let document = walker.document(value);

    match document {
        Some(document) if walker.violations.is_empty() => Ok(document),
        _ => Err(walker.violations),
    }
}

/// Accepted numeric ranges.
#[derive(Debug, Clone, Copy)]
enum Range {
    Any,
    NonNegative,
    Positive,
    Unit,
}

#[derive(Default)]
struct Walker {
    path: Vec<String>,
    violations: Vec<SchemaViolation>,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn quoted_list(values: impl IntoIterator<Item = &'static str>) -> String {
    values
        .into_iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(" | ")
}

impl Walker {
    fn current_path(&self) -> String {
        if self.path.is_empty() {
            "document".to_string()
        } else {
            self.path.join(".")
        }
    }

    fn report(&mut self, code: ViolationCode, message: impl Into<String>) {
        let path = self.current_path();
        self.violations.push(SchemaViolation::new(path, code, message));
    }

    fn at<T>(&mut self, segment: impl ToString, f: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(segment.to_string());
        let out = f(self);
        self.path.pop();
        out
    }

    fn type_mismatch(&mut self, expected: &str, value: &Value) {
        self.report(
            ViolationCode::InvalidType,
            format!("Expected {expected}, received {}", json_kind(value)),
        );
    }

    /// A field that must be present and non-null.
    fn required<T>(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        parse: impl FnOnce(&mut Self, &Value) -> Option<T>,
    ) -> Option<T> {
        self.at(key, |w| match obj.get(key) {
            None | Some(Value::Null) => {
                w.report(ViolationCode::Required, "Required");
                None
            }
            Some(value) => parse(w, value),
        })
    }

    /// A field that may be absent. Null counts as absent.
    fn optional<T>(
        &mut self,
        obj: &Map<String, Value>,
        key: &str,
        parse: impl FnOnce(&mut Self, &Value) -> Option<T>,
    ) -> Option<T> {
        match obj.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => self.at(key, |w| parse(w, value)),
        }
    }

    fn object<'v>(&mut self, value: &'v Value) -> Option<&'v Map<String, Value>> {
        if let Value::Object(map) = value {
            Some(map)
        } else {
            self.type_mismatch("object", value);
            None
        }
    }

    fn string(&mut self, value: &Value) -> Option<String> {
        if let Value::String(s) = value {
            Some(s.clone())
        } else {
            self.type_mismatch("string", value);
            None
        }
    }

    fn boolean(&mut self, value: &Value) -> Option<bool> {
        if let Value::Bool(b) = value {
            Some(*b)
        } else {
            self.type_mismatch("boolean", value);
            None
        }
    }

    fn number(&mut self, value: &Value, range: Range) -> Option<f64> {
        let Some(n) = value.as_f64() else {
            self.type_mismatch("number", value);
            return None;
        };

        let problem = match range {
            Range::Any => None,
            Range::NonNegative if n < 0.0 => Some("Number must be greater than or equal to 0"),
            Range::Positive if n <= 0.0 => Some("Number must be greater than 0"),
            Range::Unit if n < 0.0 => Some("Number must be greater than or equal to 0"),
            Range::Unit if n > 1.0 => Some("Number must be less than or equal to 1"),
            Range::NonNegative | Range::Positive | Range::Unit => None,
        };

        match problem {
            Some(message) => {
                self.report(ViolationCode::OutOfRange, message);
                None
            }
            None => Some(n),
        }
    }

    fn any_number(&mut self, value: &Value) -> Option<f64> {
        self.number(value, Range::Any)
    }

    fn non_negative(&mut self, value: &Value) -> Option<f64> {
        self.number(value, Range::NonNegative)
    }

    fn positive(&mut self, value: &Value) -> Option<f64> {
        self.number(value, Range::Positive)
    }

    fn unit(&mut self, value: &Value) -> Option<f64> {
        self.number(value, Range::Unit)
    }

    fn wire<E: WireEnum>(&mut self, value: &Value) -> Option<E> {
        let Value::String(s) = value else {
            self.type_mismatch("string", value);
            return None;
        };

        let parsed = E::parse_wire(s);
        if parsed.is_none() {
            let expected = quoted_list(E::VALUES.iter().map(|v| v.wire()));
            self.report(
                ViolationCode::InvalidEnum,
                format!("Invalid enum value. Expected {expected}, received '{s}'"),
            );
        }
        parsed
    }

    fn color(&mut self, value: &Value) -> Option<Color> {
        let Value::String(s) = value else {
            self.type_mismatch("string", value);
            return None;
        };

        let parsed = Color::parse(s);
        if parsed.is_none() {
            self.report(ViolationCode::InvalidColor, "Invalid hex color");
        }
        parsed
    }

    fn spacing(&mut self, value: &Value) -> Option<Spacing> {
        match value {
            Value::Number(_) => self.non_negative(value).map(Spacing::Uniform),
            Value::Array(items) if items.len() == 4 => {
                let sides: Vec<Option<f64>> = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| self.at(i, |w| w.non_negative(item)))
                    .collect();
                let sides: Option<Vec<f64>> = sides.into_iter().collect();
                let sides = sides?;
                Some(Spacing::Sides([sides[0], sides[1], sides[2], sides[3]]))
            }
            Value::Array(items) => {
                self.report(
                    ViolationCode::InvalidType,
                    format!("Expected 4 values, received {}", items.len()),
                );
                None
            }
            other => {
                self.type_mismatch("number or array of 4 numbers", other);
                None
            }
        }
    }

    fn document(&mut self, value: &Value) -> Option<Document> {
        let obj = self.object(value)?;

        let schema_version = self.required(obj, "schemaVersion", |w, v| {
            let version = w.string(v)?;
            if version == SCHEMA_VERSION {
                Some(version)
            } else {
                w.report(
                    ViolationCode::InvalidLiteral,
                    format!("Invalid literal value, expected \"{SCHEMA_VERSION}\""),
                );
                None
            }
        });
        let meta = self.required(obj, "meta", Self::meta);
        let tokens = self.optional(obj, "tokens", Self::tokens);
        let canvas = self.required(obj, "canvas", Self::canvas);
        let root = self.required(obj, "root", Self::node);

        Some(Document {
            schema_version: schema_version?,
            meta: meta?,
            tokens,
            canvas: canvas?,
            root: root?,
        })
    }

    fn meta(&mut self, value: &Value) -> Option<Meta> {
        let obj = self.object(value)?;

        let name = self.required(obj, "name", Self::string);
        let description = self.optional(obj, "description", Self::string);
        let generated_at = self.required(obj, "generatedAt", Self::string);
        let prompt_hash = self.optional(obj, "promptHash", Self::string);

        Some(Meta {
            name: name?,
            description,
            generated_at: generated_at?,
            prompt_hash,
        })
    }

    fn canvas(&mut self, value: &Value) -> Option<Canvas> {
        let obj = self.object(value)?;

        let width = self.required(obj, "width", Self::positive);
        let height = self.required(obj, "height", Self::positive);

        Some(Canvas {
            width: width?,
            height: height?,
        })
    }

    fn named<T>(
        &mut self,
        value: &Value,
        mut parse: impl FnMut(&mut Self, &Value) -> Option<T>,
    ) -> Option<BTreeMap<String, T>> {
        let obj = self.object(value)?;
        let mut out = BTreeMap::new();
        let mut complete = true;
        for (name, entry) in obj {
            match self.at(name, |w| parse(w, entry)) {
                Some(parsed) => {
                    out.insert(name.clone(), parsed);
                }
                None => complete = false,
            }
        }
        complete.then_some(out)
    }

    fn tokens(&mut self, value: &Value) -> Option<Tokens> {
        let obj = self.object(value)?;

        let colors = self.optional(obj, "colors", |w, v| w.named(v, Self::color));
        let typography = self.optional(obj, "typography", |w, v| w.named(v, Self::typography));
        let spacing = self.optional(obj, "spacing", |w, v| w.named(v, Self::non_negative));

        Some(Tokens {
            colors,
            typography,
            spacing,
        })
    }

    fn typography(&mut self, value: &Value) -> Option<Typography> {
        let obj = self.object(value)?;

        let family = self.required(obj, "family", Self::wire);
        let weight = self.required(obj, "weight", Self::wire);
        let size = self.required(obj, "size", Self::positive);
        let line_height = self.optional(obj, "lineHeight", Self::positive);

        Some(Typography {
            family: family?,
            weight: weight?,
            size: size?,
            line_height,
        })
    }

    fn node(&mut self, value: &Value) -> Option<Node> {
        let obj = self.object(value)?;

        let kind = self.required(obj, "type", |w, v| {
            let Value::String(s) = v else {
                w.type_mismatch("string", v);
                return None;
            };
            let kind = NodeType::from_wire(s);
            if kind.is_none() {
                w.report(
                    ViolationCode::UnknownNodeKind,
                    format!(
                        "Unknown node type '{s}'. Expected {}",
                        quoted_list(NodeType::ALL.iter().map(|k| k.as_str()))
                    ),
                );
            }
            kind
        });
        let props = self.props(obj);

        let kind = kind?;
        self.reject_foreign_payloads(obj, kind);

        match kind {
            NodeType::Frame => {
                let children = self.children(obj);
                Some(Node::Frame(FrameNode {
                    props: props?,
                    children: children?,
                }))
            }
            NodeType::Component => {
                let component_key = self.optional(obj, "componentKey", Self::string);
                let children = self.children(obj);
                Some(Node::Component(ComponentNode {
                    props: props?,
                    component_key,
                    children: children?,
                }))
            }
            NodeType::Text => {
                let text = self.required(obj, "text", Self::text_content);
                Some(Node::Text(TextNode {
                    props: props?,
                    text: text?,
                }))
            }
            NodeType::Image => {
                let image = self.required(obj, "image", Self::image_content);
                Some(Node::Image(ImageNode {
                    props: props?,
                    image: image?,
                }))
            }
            NodeType::Rectangle => Some(Node::Rectangle(RectangleNode { props: props? })),
        }
    }

    fn reject_foreign_payloads(&mut self, obj: &Map<String, Value>, kind: NodeType) {
        let allowed: &[&str] = match kind {
            NodeType::Frame => &["children"],
            NodeType::Component => &["children", "componentKey"],
            NodeType::Text => &["text"],
            NodeType::Image => &["image"],
            NodeType::Rectangle => &[],
        };

        for key in ["text", "image", "children", "componentKey"] {
            let present = obj.get(key).is_some_and(|v| !v.is_null());
            if present && !allowed.contains(&key) {
                self.at(key, |w| {
                    w.report(
                        ViolationCode::UnexpectedField,
                        format!("Field '{key}' is not allowed on {kind} nodes"),
                    );
                });
            }
        }
    }

    fn children(&mut self, obj: &Map<String, Value>) -> Option<Vec<Node>> {
        let Some(value) = obj.get("children").filter(|v| !v.is_null()) else {
            return Some(Vec::new());
        };

        self.at("children", |w| {
            let Value::Array(items) = value else {
                w.type_mismatch("array", value);
                return None;
            };
            let nodes: Vec<Option<Node>> = items
                .iter()
                .enumerate()
                .map(|(i, item)| w.at(i, |w| w.node(item)))
                .collect();
            nodes.into_iter().collect()
        })
    }

    fn props(&mut self, obj: &Map<String, Value>) -> Option<NodeProps> {
        let before = self.violations.len();

        let props = NodeProps {
            id: self.optional(obj, "id", Self::string),
            name: self.optional(obj, "name", Self::string),
            width: self.optional(obj, "width", Self::non_negative),
            height: self.optional(obj, "height", Self::non_negative),
            layout: self.optional(obj, "layout", Self::layout),
            sizing: self.optional(obj, "sizing", Self::sizing),
            style: self.optional(obj, "style", Self::style),
        };

        (self.violations.len() == before).then_some(props)
    }

    fn layout(&mut self, value: &Value) -> Option<LayoutConfig> {
        let obj = self.object(value)?;

        let direction = self.required(obj, "direction", Self::wire);
        let align = self.optional(obj, "align", Self::wire);
        let cross_align = self.optional(obj, "crossAlign", Self::wire);
        let gap = self.optional(obj, "gap", Self::non_negative);
        let padding = self.optional(obj, "padding", Self::spacing);
        let wrap = self.optional(obj, "wrap", Self::boolean);

        Some(LayoutConfig {
            direction: direction?,
            align,
            cross_align,
            gap,
            padding,
            wrap,
        })
    }

    fn sizing(&mut self, value: &Value) -> Option<SizingConfig> {
        let obj = self.object(value)?;

        let width = self.required(obj, "width", Self::wire);
        let height = self.required(obj, "height", Self::wire);
        let min_width = self.optional(obj, "minWidth", Self::non_negative);
        let max_width = self.optional(obj, "maxWidth", Self::non_negative);
        let min_height = self.optional(obj, "minHeight", Self::non_negative);
        let max_height = self.optional(obj, "maxHeight", Self::non_negative);

        for (min, max, key, min_key) in [
            (min_width, max_width, "maxWidth", "minWidth"),
            (min_height, max_height, "maxHeight", "minHeight"),
        ] {
            if let (Some(min), Some(max)) = (min, max) {
                if min > max {
                    self.at(key, |w| {
                        w.report(
                            ViolationCode::OutOfRange,
                            format!("{key} must be greater than or equal to {min_key}"),
                        );
                    });
                }
            }
        }

        Some(SizingConfig {
            width: width?,
            height: height?,
            min_width,
            max_width,
            min_height,
            max_height,
        })
    }

    fn style(&mut self, value: &Value) -> Option<NodeStyle> {
        let obj = self.object(value)?;

        Some(NodeStyle {
            fill: self.optional(obj, "fill", Self::fill),
            stroke: self.optional(obj, "stroke", Self::stroke),
            shadow: self.optional(obj, "shadow", Self::shadow),
            corner_radius: self.optional(obj, "cornerRadius", Self::spacing),
            opacity: self.optional(obj, "opacity", Self::unit),
        })
    }

    fn fill(&mut self, value: &Value) -> Option<Fill> {
        let obj = self.object(value)?;

        let kind = self.required(obj, "type", |w, v| {
            let kind = w.string(v)?;
            if matches!(kind.as_str(), "solid" | "gradient") {
                Some(kind)
            } else {
                w.report(
                    ViolationCode::InvalidEnum,
                    format!(
                        "Invalid discriminator value. Expected 'solid' | 'gradient', received '{kind}'"
                    ),
                );
                None
            }
        })?;

        if kind == "solid" {
            let color = self.required(obj, "color", Self::color);
            return Some(Fill::Solid { color: color? });
        }

        let stops = self.required(obj, "gradientStops", |w, v| {
            let Value::Array(items) = v else {
                w.type_mismatch("array", v);
                return None;
            };
            let stops: Vec<Option<GradientStop>> = items
                .iter()
                .enumerate()
                .map(|(i, item)| w.at(i, |w| w.gradient_stop(item)))
                .collect();
            if items.len() < 2 {
                w.report(
                    ViolationCode::TooFewItems,
                    "Gradient must contain at least 2 stops",
                );
                return None;
            }
            stops.into_iter().collect::<Option<Vec<_>>>()
        });
        let angle = self.optional(obj, "gradientAngle", Self::any_number);

        Some(Fill::Gradient {
            stops: stops?,
            angle,
        })
    }

    fn gradient_stop(&mut self, value: &Value) -> Option<GradientStop> {
        let obj = self.object(value)?;

        let color = self.required(obj, "color", Self::color);
        let position = self.required(obj, "position", Self::unit);

        Some(GradientStop {
            color: color?,
            position: position?,
        })
    }

    fn stroke(&mut self, value: &Value) -> Option<Stroke> {
        let obj = self.object(value)?;

        let color = self.required(obj, "color", Self::color);
        let weight = self.required(obj, "weight", Self::non_negative);
        let position = self.optional(obj, "position", Self::wire);

        Some(Stroke {
            color: color?,
            weight: weight?,
            position,
        })
    }

    fn shadow(&mut self, value: &Value) -> Option<Shadow> {
        let obj = self.object(value)?;

        let kind = self.required(obj, "type", Self::wire);
        let color = self.required(obj, "color", Self::color);
        let offset_x = self.required(obj, "offsetX", Self::any_number);
        let offset_y = self.required(obj, "offsetY", Self::any_number);
        let blur = self.required(obj, "blur", Self::non_negative);
        let spread = self.optional(obj, "spread", Self::any_number);

        Some(Shadow {
            kind: kind?,
            color: color?,
            offset_x: offset_x?,
            offset_y: offset_y?,
            blur: blur?,
            spread,
        })
    }

    fn text_content(&mut self, value: &Value) -> Option<TextContent> {
        let obj = self.object(value)?;

        let content = self.required(obj, "content", Self::string);
        let typography = self.optional(obj, "typography", Self::typography);
        let color = self.optional(obj, "color", Self::color);
        let align = self.optional(obj, "align", Self::wire);

        Some(TextContent {
            content: content?,
            typography,
            color,
            align,
        })
    }

    fn image_content(&mut self, value: &Value) -> Option<ImageContent> {
        let obj = self.object(value)?;

        Some(ImageContent {
            url: self.optional(obj, "url", Self::string),
            placeholder: self.optional(obj, "placeholder", Self::boolean),
            scale_mode: self.optional(obj, "scaleMode", Self::wire),
        })
    }
}
