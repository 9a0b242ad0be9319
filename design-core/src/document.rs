//! Design document model.
//!
//! A [`Document`] is the verified intermediate format between the text
//! generator and the scene host. Values of these types only come out of the
//! validator (or are built by hand in tests), so every enum and color in here
//! is already canonical.
//!
//! ## Example
//!
//! ```json
//! {
//!   "schemaVersion": "1.0",
//!   "meta": { "name": "Card", "generatedAt": "2024-01-01T00:00:00Z" },
//!   "canvas": { "width": 1440, "height": 900 },
//!   "root": {
//!     "type": "frame",
//!     "layout": { "direction": "vertical", "padding": 24, "gap": 12 },
//!     "children": [
//!       { "type": "text", "text": { "content": "Title" } }
//!     ]
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// The only schema version this crate accepts.
pub const SCHEMA_VERSION: &str = "1.0";

/// Declares a closed set of string literals used on the wire.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $wire)] $variant ),+
        }

        impl $name {
            /// Every accepted value, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// The wire literal.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            /// Look up a value by its wire literal (case-sensitive).
            #[must_use]
            pub fn from_wire(value: &str) -> Option<Self> {
                match value {
                    $($wire => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl WireEnum for $name {
            const VALUES: &'static [Self] = Self::ALL;

            fn wire(self) -> &'static str {
                self.as_str()
            }

            fn parse_wire(value: &str) -> Option<Self> {
                Self::from_wire(value)
            }
        }
    };
}

/// A closed set of string literals, generic over the concrete enum.
pub trait WireEnum: Sized + Copy + 'static {
    /// Every accepted value, in declaration order.
    const VALUES: &'static [Self];

    /// The wire literal.
    fn wire(self) -> &'static str;

    /// Look up a value by its wire literal.
    fn parse_wire(value: &str) -> Option<Self>;
}

wire_enum! {
    /// Auto-layout direction of a container.
    Direction {
        /// Children flow left to right.
        Horizontal => "horizontal",
        /// Children flow top to bottom.
        Vertical => "vertical",
        /// No auto-layout; children are free-positioned.
        None => "none",
    }
}

wire_enum! {
    /// Primary-axis alignment.
    MainAlign {
        /// Pack at the start.
        Start => "start",
        /// Center.
        Center => "center",
        /// Pack at the end.
        End => "end",
        /// Distribute free space between children.
        SpaceBetween => "space-between",
    }
}

wire_enum! {
    /// Cross-axis alignment.
    CrossAlign {
        /// Align to the start.
        Start => "start",
        /// Center.
        Center => "center",
        /// Align to the end.
        End => "end",
        /// Children fill the cross axis.
        Stretch => "stretch",
    }
}

wire_enum! {
    /// How a node is sized along one axis.
    SizingMode {
        /// Use the explicit dimension.
        Fixed => "fixed",
        /// Shrink to content.
        Hug => "hug",
        /// Expand to the space available in an auto-layout parent.
        Fill => "fill",
    }
}

wire_enum! {
    /// Fonts the generator is allowed to pick.
    FontFamily {
        /// Inter (the default family).
        Inter => "Inter",
        /// Roboto.
        Roboto => "Roboto",
        /// Open Sans.
        OpenSans => "Open Sans",
        /// Poppins.
        Poppins => "Poppins",
    }
}

wire_enum! {
    /// Font weights the generator is allowed to pick.
    FontWeight {
        /// 400.
        Regular => "regular",
        /// 500.
        Medium => "medium",
        /// 600.
        Semibold => "semibold",
        /// 700.
        Bold => "bold",
    }
}

wire_enum! {
    /// Horizontal text alignment.
    TextAlign {
        /// Left aligned.
        Left => "left",
        /// Centered.
        Center => "center",
        /// Right aligned.
        Right => "right",
    }
}

wire_enum! {
    /// Where a stroke sits relative to the node outline.
    StrokePosition {
        /// Inside the outline.
        Inside => "inside",
        /// Outside the outline.
        Outside => "outside",
        /// Centered on the outline.
        Center => "center",
    }
}

wire_enum! {
    /// Shadow flavor.
    ShadowKind {
        /// Drop shadow.
        Drop => "drop",
        /// Inner shadow.
        Inner => "inner",
    }
}

wire_enum! {
    /// How an image fills its box.
    ScaleMode {
        /// Cover the box, cropping overflow.
        Fill => "fill",
        /// Fit inside the box.
        Fit => "fit",
        /// Crop to the box.
        Crop => "crop",
        /// Repeat.
        Tile => "tile",
    }
}

wire_enum! {
    /// Discriminator of [`Node`], as it appears in the `type` field.
    NodeType {
        /// Container.
        Frame => "frame",
        /// Text.
        Text => "text",
        /// Rectangle.
        Rectangle => "rectangle",
        /// Image.
        Image => "image",
        /// Reusable component.
        Component => "component",
    }
}

/// Root aggregate produced by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Always [`SCHEMA_VERSION`].
    pub schema_version: String,
    /// Descriptive metadata.
    pub meta: Meta,
    /// Named design tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Tokens>,
    /// Target canvas size.
    pub canvas: Canvas,
    /// The single root node.
    pub root: Node,
}

/// Document metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Human-readable design name.
    pub name: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// ISO-8601 generation timestamp.
    pub generated_at: String,
    /// Optional traceability hash of the originating prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_hash: Option<String>,
}

/// Named design tokens. Keys are unique by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tokens {
    /// Named colors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<BTreeMap<String, Color>>,
    /// Named typography presets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<BTreeMap<String, Typography>>,
    /// Named spacing values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<BTreeMap<String, f64>>,
}

impl Tokens {
    /// Look up a named color.
    #[must_use]
    pub fn color(&self, name: &str) -> Option<&Color> {
        self.colors.as_ref()?.get(name)
    }

    /// Look up a named typography preset.
    #[must_use]
    pub fn typography(&self, name: &str) -> Option<&Typography> {
        self.typography.as_ref()?.get(name)
    }

    /// Look up a named spacing value.
    #[must_use]
    pub fn spacing(&self, name: &str) -> Option<f64> {
        self.spacing.as_ref()?.get(name).copied()
    }
}

/// Canvas dimensions. Both are strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

/// A node of the design tree.
///
/// Every traversal (sanitizer, validator, renderer) matches on this
/// exhaustively, so adding a kind forces all of them to be updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Node {
    /// Auto-layout container.
    Frame(FrameNode),
    /// Text run.
    Text(TextNode),
    /// Plain shape.
    Rectangle(RectangleNode),
    /// Image box.
    Image(ImageNode),
    /// Reusable component, rendered like a frame.
    Component(ComponentNode),
}

impl Node {
    /// Attributes shared by all kinds.
    #[must_use]
    pub fn props(&self) -> &NodeProps {
        match self {
            Self::Frame(n) => &n.props,
            Self::Text(n) => &n.props,
            Self::Rectangle(n) => &n.props,
            Self::Image(n) => &n.props,
            Self::Component(n) => &n.props,
        }
    }

    /// Child nodes in render order. Empty for leaf kinds.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        match self {
            Self::Frame(n) => &n.children,
            Self::Component(n) => &n.children,
            Self::Text(_) | Self::Rectangle(_) | Self::Image(_) => &[],
        }
    }

    /// The wire discriminator.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Frame(_) => NodeType::Frame,
            Self::Text(_) => NodeType::Text,
            Self::Rectangle(_) => NodeType::Rectangle,
            Self::Image(_) => NodeType::Image,
            Self::Component(_) => NodeType::Component,
        }
    }

    /// Total number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(Node::count).sum::<usize>()
    }
}

/// Attributes common to every node kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeProps {
    /// Stable identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Explicit width, used when sizing is fixed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Explicit height, used when sizing is fixed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Auto-layout of this node's children (containers only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutConfig>,
    /// How this node sizes itself inside its parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sizing: Option<SizingConfig>,
    /// Visual style.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<NodeStyle>,
}

/// Container node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameNode {
    /// Shared attributes.
    #[serde(flatten)]
    pub props: NodeProps,
    /// Children in render order.
    #[serde(default)]
    pub children: Vec<Node>,
}

/// Text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextNode {
    /// Shared attributes.
    #[serde(flatten)]
    pub props: NodeProps,
    /// Text payload.
    pub text: TextContent,
}

/// Rectangle node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RectangleNode {
    /// Shared attributes.
    #[serde(flatten)]
    pub props: NodeProps,
}

/// Image node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageNode {
    /// Shared attributes.
    #[serde(flatten)]
    pub props: NodeProps,
    /// Image payload.
    pub image: ImageContent,
}

/// Reusable component node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentNode {
    /// Shared attributes.
    #[serde(flatten)]
    pub props: NodeProps,
    /// Key of an existing component this node refers to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_key: Option<String>,
    /// Children in render order.
    #[serde(default)]
    pub children: Vec<Node>,
}

/// Auto-layout configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Flow direction.
    pub direction: Direction,
    /// Primary-axis alignment (default start).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<MainAlign>,
    /// Cross-axis alignment (default start).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cross_align: Option<CrossAlign>,
    /// Spacing between children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<f64>,
    /// Inner padding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<Spacing>,
    /// Wrap children onto new rows (horizontal only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap: Option<bool>,
}

impl LayoutConfig {
    /// Primary alignment with the default applied.
    #[must_use]
    pub fn align(&self) -> MainAlign {
        self.align.unwrap_or(MainAlign::Start)
    }

    /// Cross alignment with the default applied.
    #[must_use]
    pub fn cross_align(&self) -> CrossAlign {
        self.cross_align.unwrap_or(CrossAlign::Start)
    }
}

/// A single number or a positional 4-tuple.
///
/// For padding the tuple is `[top, right, bottom, left]`; for corner radius it
/// is `[top-left, top-right, bottom-right, bottom-left]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Spacing {
    /// Same value on all four sides/corners.
    Uniform(f64),
    /// One value per side/corner.
    Sides([f64; 4]),
}

impl Spacing {
    /// Expand to four positional values.
    #[must_use]
    pub fn expand(self) -> [f64; 4] {
        match self {
            Self::Uniform(v) => [v; 4],
            Self::Sides(sides) => sides,
        }
    }
}

/// Per-axis sizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizingConfig {
    /// Horizontal mode.
    pub width: SizingMode,
    /// Vertical mode.
    pub height: SizingMode,
    /// Lower width bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,
    /// Upper width bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    /// Lower height bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f64>,
    /// Upper height bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
}

impl SizingConfig {
    /// Both axes hug their content.
    #[must_use]
    pub fn hug() -> Self {
        Self {
            width: SizingMode::Hug,
            height: SizingMode::Hug,
            min_width: None,
            max_width: None,
            min_height: None,
            max_height: None,
        }
    }

    /// Whether any min/max bound is present.
    #[must_use]
    pub fn has_bounds(&self) -> bool {
        self.min_width.is_some()
            || self.max_width.is_some()
            || self.min_height.is_some()
            || self.max_height.is_some()
    }
}

/// Visual style block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStyle {
    /// Background fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<Fill>,
    /// Outline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    /// Shadow effect.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    /// Corner radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub corner_radius: Option<Spacing>,
    /// Opacity in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
}

/// Fill paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Fill {
    /// Single color.
    Solid {
        /// Fill color.
        color: Color,
    },
    /// Linear gradient with at least two stops.
    Gradient {
        /// Ordered stops.
        #[serde(rename = "gradientStops")]
        stops: Vec<GradientStop>,
        /// Angle in degrees (default 180).
        #[serde(
            rename = "gradientAngle",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        angle: Option<f64>,
    },
}

/// A gradient stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Stop color.
    pub color: Color,
    /// Position in `[0, 1]`.
    pub position: f64,
}

/// Outline stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    /// Stroke color.
    pub color: Color,
    /// Stroke weight in pixels.
    pub weight: f64,
    /// Stroke alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<StrokePosition>,
}

/// Shadow effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shadow {
    /// Drop or inner.
    #[serde(rename = "type")]
    pub kind: ShadowKind,
    /// Shadow color.
    pub color: Color,
    /// Horizontal offset.
    pub offset_x: f64,
    /// Vertical offset.
    pub offset_y: f64,
    /// Blur radius.
    pub blur: f64,
    /// Spread.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<f64>,
}

/// Typography preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    /// Font family.
    pub family: FontFamily,
    /// Font weight.
    pub weight: FontWeight,
    /// Font size in pixels.
    pub size: f64,
    /// Line height as a multiple of the font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
}

impl Default for Typography {
    fn default() -> Self {
        Self {
            family: FontFamily::Inter,
            weight: FontWeight::Regular,
            size: 16.0,
            line_height: None,
        }
    }
}

/// Text payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    /// The string to display.
    pub content: String,
    /// Font settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography: Option<Typography>,
    /// Text color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Horizontal alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<TextAlign>,
}

/// Image payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    /// Remote source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Render a grey placeholder instead of fetching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<bool>,
    /// How the image fills its box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_mode: Option<ScaleMode>,
}
