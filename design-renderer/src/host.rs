//! Scene-graph host capability.
//!
//! A host owns the real drawing surface. The render engine only talks to it
//! through [`SceneHost`], so the same traversal drives a live editor, the
//! in-memory [`MemoryHost`](crate::MemoryHost), or anything else that can
//! create nodes and apply native auto-layout.
//!
//! Two host rules shape the engine:
//! - per-axis sizing modes can only be set once a node is attached to a
//!   parent (or the page);
//! - text content can only be set after a loaded font is bound to the node.

use std::fmt;

use async_trait::async_trait;
use design_core::Rgba;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for host operations.
pub type HostResult<T> = Result<T, HostError>;

/// Errors reported by a host.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HostError {
    /// The node id is unknown (never created or already removed).
    #[error("Node not found: {0}")]
    NodeNotFound(HostNodeId),

    /// A post-attachment operation was attempted on a detached node.
    #[error("Node {0} must be attached before its sizing can be set")]
    NotAttached(HostNodeId),

    /// The node kind does not support the operation.
    #[error("{operation} is not supported on {kind} node {node}")]
    Unsupported {
        /// Target node.
        node: HostNodeId,
        /// Its kind.
        kind: HostNodeKind,
        /// The rejected operation.
        operation: &'static str,
    },

    /// A font was used before being loaded.
    #[error("Font not loaded: {0}")]
    FontNotLoaded(FontName),

    /// The host does not have the requested font.
    #[error("Font unavailable: {0}")]
    FontUnavailable(FontName),

    /// Fetching a remote image failed.
    #[error("Failed to load image {url}: {reason}")]
    ImageFetch {
        /// Requested URL.
        url: String,
        /// Host-supplied reason.
        reason: String,
    },

    /// Any other rejected call.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Opaque handle of a host node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HostNodeId(pub u64);

impl fmt::Display for HostNodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Native node kinds a host can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostNodeKind {
    /// Container with optional auto-layout.
    Frame,
    /// Text run.
    Text,
    /// Shape (also used for images).
    Rectangle,
}

impl fmt::Display for HostNodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Frame => "frame",
            Self::Text => "text",
            Self::Rectangle => "rectangle",
        };
        f.write_str(name)
    }
}

/// Auto-layout mode of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutMode {
    /// Free positioning.
    #[default]
    None,
    /// Row.
    Horizontal,
    /// Column.
    Vertical,
}

/// Primary-axis alignment primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrimaryAxisAlign {
    /// Start.
    #[default]
    Min,
    /// Center.
    Center,
    /// End.
    Max,
    /// Distribute free space.
    SpaceBetween,
}

/// Cross-axis alignment primitive. Hosts have no stretch primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CounterAxisAlign {
    /// Start.
    #[default]
    Min,
    /// Center.
    Center,
    /// End.
    Max,
}

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Width.
    Horizontal,
    /// Height.
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        })
    }
}

/// Per-axis sizing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AxisSizing {
    /// Explicit dimension.
    #[default]
    Fixed,
    /// Shrink to content.
    Hug,
    /// Expand inside an auto-layout parent.
    Fill,
}

/// Padding as `[top, right, bottom, left]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Padding {
    /// Top.
    pub top: f64,
    /// Right.
    pub right: f64,
    /// Bottom.
    pub bottom: f64,
    /// Left.
    pub left: f64,
}

impl From<[f64; 4]> for Padding {
    fn from([top, right, bottom, left]: [f64; 4]) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Corner radii as `[top-left, top-right, bottom-right, bottom-left]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerRadii {
    /// Top left.
    pub top_left: f64,
    /// Top right.
    pub top_right: f64,
    /// Bottom right.
    pub bottom_right: f64,
    /// Bottom left.
    pub bottom_left: f64,
}

impl From<[f64; 4]> for CornerRadii {
    fn from([top_left, top_right, bottom_right, bottom_left]: [f64; 4]) -> Self {
        Self {
            top_left,
            top_right,
            bottom_right,
            bottom_left,
        }
    }
}

/// Optional min/max bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeBounds {
    /// Minimum width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<f64>,
    /// Maximum width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<f64>,
    /// Minimum height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f64>,
    /// Maximum height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<f64>,
}

impl SizeBounds {
    /// True when no bound is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_width.is_none()
            && self.max_width.is_none()
            && self.min_height.is_none()
            && self.max_height.is_none()
    }
}

/// Handle of an image already uploaded to the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageHandle(pub String);

/// How an image paint fills its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ImageScaleMode {
    /// Cover.
    #[default]
    Fill,
    /// Contain.
    Fit,
    /// Crop.
    Crop,
    /// Repeat.
    Tile,
}

/// Affine transform `[[a, b, tx], [c, d, ty]]` in normalized node space.
pub type GradientTransform = [[f64; 3]; 2];

/// A gradient stop in host form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaintStop {
    /// Stop color.
    pub color: Rgba,
    /// Position in `[0, 1]`.
    pub position: f64,
}

/// A fill or stroke paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Paint {
    /// Single color.
    Solid {
        /// Color with alpha.
        color: Rgba,
    },
    /// Linear gradient.
    GradientLinear {
        /// Ordered stops.
        stops: Vec<PaintStop>,
        /// Placement of the gradient line.
        transform: GradientTransform,
    },
    /// Uploaded image.
    Image {
        /// Host image handle.
        handle: ImageHandle,
        /// Scale mode.
        scale_mode: ImageScaleMode,
    },
}

/// Shadow effect kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    /// Drop shadow.
    DropShadow,
    /// Inner shadow.
    InnerShadow,
}

/// A shadow effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// Drop or inner.
    pub kind: EffectKind,
    /// Color with alpha.
    pub color: Rgba,
    /// Offset `(x, y)`.
    pub offset: (f64, f64),
    /// Blur radius.
    pub radius: f64,
    /// Spread.
    pub spread: f64,
}

/// Stroke alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrokeAlign {
    /// Inside.
    Inside,
    /// Outside.
    Outside,
    /// Centered.
    Center,
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlignHorizontal {
    /// Left.
    Left,
    /// Center.
    Center,
    /// Right.
    Right,
}

/// A host font: family plus style name (e.g. `Inter` / `Semi Bold`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontName {
    /// Family.
    pub family: String,
    /// Style name.
    pub style: String,
}

impl FontName {
    /// Create a font name.
    #[must_use]
    pub fn new(family: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            style: style.into(),
        }
    }
}

impl fmt::Display for FontName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.family, self.style)
    }
}

/// Primitives a drawing surface must offer to the render engine.
///
/// All methods except [`load_font`](Self::load_font) and
/// [`create_image`](Self::create_image) are synchronous.
#[async_trait]
pub trait SceneHost: Send {
    /// Create a detached frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses to create the node.
    fn create_frame(&mut self) -> HostResult<HostNodeId>;

    /// Create a detached text node.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses to create the node.
    fn create_text(&mut self) -> HostResult<HostNodeId>;

    /// Create a detached rectangle.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses to create the node.
    fn create_rectangle(&mut self) -> HostResult<HostNodeId>;

    /// Remove a node and its subtree.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist.
    fn remove(&mut self, node: HostNodeId) -> HostResult<()>;

    /// Set the display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist.
    fn set_name(&mut self, node: HostNodeId, name: &str) -> HostResult<()>;

    /// Set explicit dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist.
    fn resize(&mut self, node: HostNodeId, width: f64, height: f64) -> HostResult<()>;

    /// Append `child` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if either node is missing or `parent` is not a frame.
    fn append_child(&mut self, parent: HostNodeId, child: HostNodeId) -> HostResult<()>;

    /// Append a node to the current page.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist.
    fn append_to_page(&mut self, node: HostNodeId) -> HostResult<()>;

    /// Set the auto-layout mode of a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not a frame.
    fn set_layout_mode(&mut self, node: HostNodeId, mode: LayoutMode) -> HostResult<()>;

    /// Set auto-layout padding.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not a frame.
    fn set_padding(&mut self, node: HostNodeId, padding: Padding) -> HostResult<()>;

    /// Set spacing between auto-layout children.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not a frame.
    fn set_item_spacing(&mut self, node: HostNodeId, spacing: f64) -> HostResult<()>;

    /// Set primary-axis alignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not a frame.
    fn set_primary_axis_align(&mut self, node: HostNodeId, align: PrimaryAxisAlign)
        -> HostResult<()>;

    /// Set cross-axis alignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not a frame.
    fn set_counter_axis_align(&mut self, node: HostNodeId, align: CounterAxisAlign)
        -> HostResult<()>;

    /// Enable or disable wrapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not a horizontal auto-layout frame.
    fn set_layout_wrap(&mut self, node: HostNodeId, wrap: bool) -> HostResult<()>;

    /// Set the sizing mode of one axis. Only valid after attachment.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::NotAttached`] for detached nodes, and an error when
    /// the mode is not allowed in the node's context.
    fn set_layout_sizing(&mut self, node: HostNodeId, axis: Axis, sizing: AxisSizing)
        -> HostResult<()>;

    /// Whether min/max bounds can be applied to this node.
    fn supports_size_bounds(&self, node: HostNodeId) -> bool;

    /// Apply min/max bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not support bounds.
    fn set_size_bounds(&mut self, node: HostNodeId, bounds: SizeBounds) -> HostResult<()>;

    /// Replace the fills.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist.
    fn set_fills(&mut self, node: HostNodeId, fills: Vec<Paint>) -> HostResult<()>;

    /// Replace the strokes.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist.
    fn set_strokes(
        &mut self,
        node: HostNodeId,
        strokes: Vec<Paint>,
        weight: f64,
        align: Option<StrokeAlign>,
    ) -> HostResult<()>;

    /// Replace the effects.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist.
    fn set_effects(&mut self, node: HostNodeId, effects: Vec<Effect>) -> HostResult<()>;

    /// Set corner radii.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is a text node.
    fn set_corner_radii(&mut self, node: HostNodeId, radii: CornerRadii) -> HostResult<()>;

    /// Set opacity.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist.
    fn set_opacity(&mut self, node: HostNodeId, opacity: f64) -> HostResult<()>;

    /// Load a font so it can be bound to text nodes.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::FontUnavailable`] if the host lacks the font.
    async fn load_font(&mut self, font: &FontName) -> HostResult<()>;

    /// Bind a loaded font to a text node.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::FontNotLoaded`] if the font was never loaded.
    fn set_font_name(&mut self, node: HostNodeId, font: &FontName) -> HostResult<()>;

    /// Set text content. Requires a bound, loaded font.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::FontNotLoaded`] when no loaded font is bound.
    fn set_characters(&mut self, node: HostNodeId, characters: &str) -> HostResult<()>;

    /// Set the font size in pixels.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not a text node.
    fn set_font_size(&mut self, node: HostNodeId, size: f64) -> HostResult<()>;

    /// Set the line height in pixels.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not a text node.
    fn set_line_height(&mut self, node: HostNodeId, pixels: f64) -> HostResult<()>;

    /// Set horizontal text alignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not a text node.
    fn set_text_align(&mut self, node: HostNodeId, align: TextAlignHorizontal) -> HostResult<()>;

    /// Fetch a remote image and register it with the host.
    ///
    /// # Errors
    ///
    /// Returns [`HostError::ImageFetch`] when the fetch fails.
    async fn create_image(&mut self, url: &str) -> HostResult<ImageHandle>;

    /// Move a node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node does not exist.
    fn set_position(&mut self, node: HostNodeId, x: f64, y: f64) -> HostResult<()>;

    /// Replace the page selection.
    ///
    /// # Errors
    ///
    /// Returns an error if any node does not exist.
    fn set_selection(&mut self, nodes: &[HostNodeId]) -> HostResult<()>;

    /// Scroll and zoom the viewport onto the nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if any node does not exist.
    fn focus_viewport(&mut self, nodes: &[HostNodeId]) -> HostResult<()>;
}
