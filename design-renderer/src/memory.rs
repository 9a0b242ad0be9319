//! In-memory scene host.
//!
//! [`MemoryHost`] keeps a scene graph in a map and enforces the same rules a
//! real editor does, so render ordering can be checked without one:
//! - sizing modes need an attached node;
//! - `fill` needs an auto-layout parent, `hug` a text node or an auto-layout
//!   frame;
//! - text content needs a bound font that was loaded first.
//!
//! Every mutating call is also appended to an operation log.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde::Serialize;

use crate::host::{
    Axis, AxisSizing, CornerRadii, CounterAxisAlign, Effect, FontName, HostError, HostNodeId,
    HostNodeKind, HostResult, ImageHandle, LayoutMode, Padding, Paint, PrimaryAxisAlign,
    SceneHost, SizeBounds, StrokeAlign, TextAlignHorizontal,
};

/// Where a node is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "id")]
pub enum Attachment {
    /// Not attached yet.
    Detached,
    /// Top-level on the page.
    Page,
    /// Child of a frame.
    Parent(HostNodeId),
}

/// A node of the in-memory scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryNode {
    /// Handle.
    pub id: HostNodeId,
    /// Native kind.
    pub kind: HostNodeKind,
    /// Display name.
    pub name: String,
    /// X position.
    pub x: f64,
    /// Y position.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
    /// Attachment.
    #[serde(skip)]
    pub attachment: Attachment,
    /// Children in order.
    #[serde(skip)]
    pub children: Vec<HostNodeId>,
    /// Auto-layout mode.
    pub layout_mode: LayoutMode,
    /// Padding.
    pub padding: Padding,
    /// Gap.
    pub item_spacing: f64,
    /// Primary alignment.
    pub primary_axis_align: PrimaryAxisAlign,
    /// Cross alignment.
    pub counter_axis_align: CounterAxisAlign,
    /// Wrap flag.
    pub wrap: bool,
    /// Horizontal sizing mode.
    pub sizing_horizontal: AxisSizing,
    /// Vertical sizing mode.
    pub sizing_vertical: AxisSizing,
    /// Min/max bounds.
    pub bounds: SizeBounds,
    /// Fills.
    pub fills: Vec<Paint>,
    /// Strokes.
    pub strokes: Vec<Paint>,
    /// Stroke weight.
    pub stroke_weight: f64,
    /// Stroke alignment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_align: Option<StrokeAlign>,
    /// Effects.
    pub effects: Vec<Effect>,
    /// Corner radii.
    pub corner_radii: CornerRadii,
    /// Opacity.
    pub opacity: f64,
    /// Bound font (text only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<FontName>,
    /// Text content (text only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters: Option<String>,
    /// Font size (text only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    /// Line height in pixels (text only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    /// Alignment (text only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlignHorizontal>,
}

impl MemoryNode {
    fn new(id: HostNodeId, kind: HostNodeKind) -> Self {
        // Frames start with the white fill editors add by default.
        let fills = match kind {
            HostNodeKind::Frame => vec![Paint::Solid {
                color: design_core::Rgba {
                    r: 1.0,
                    g: 1.0,
                    b: 1.0,
                    a: 1.0,
                },
            }],
            HostNodeKind::Text | HostNodeKind::Rectangle => Vec::new(),
        };

        Self {
            id,
            kind,
            name: String::new(),
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            attachment: Attachment::Detached,
            children: Vec::new(),
            layout_mode: LayoutMode::None,
            padding: Padding::default(),
            item_spacing: 0.0,
            primary_axis_align: PrimaryAxisAlign::Min,
            counter_axis_align: CounterAxisAlign::Min,
            wrap: false,
            sizing_horizontal: AxisSizing::Fixed,
            sizing_vertical: AxisSizing::Fixed,
            bounds: SizeBounds::default(),
            fills,
            strokes: Vec::new(),
            stroke_weight: 0.0,
            stroke_align: None,
            effects: Vec::new(),
            corner_radii: CornerRadii::default(),
            opacity: 1.0,
            font: None,
            characters: None,
            font_size: None,
            line_height: None,
            text_align: None,
        }
    }
}

/// A node with its subtree, for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct SceneTree {
    /// The node.
    #[serde(flatten)]
    pub node: MemoryNode,
    /// Its children.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SceneTree>,
}

/// A host call, recorded in order.
#[derive(Debug, Clone, PartialEq)]
pub enum HostOp {
    /// A node was created.
    Create(HostNodeId, HostNodeKind),
    /// A node was attached (`None` means the page).
    Attach {
        /// Attached node.
        node: HostNodeId,
        /// New parent.
        parent: Option<HostNodeId>,
    },
    /// A sizing mode was set.
    SetSizing(HostNodeId, Axis, AxisSizing),
    /// A font load was requested.
    LoadFont(FontName),
    /// A font was bound.
    SetFont(HostNodeId),
    /// Text content was set.
    SetCharacters(HostNodeId),
    /// An image fetch was requested.
    FetchImage(String),
    /// A subtree was removed.
    Remove(HostNodeId),
}

/// In-memory [`SceneHost`].
#[derive(Debug, Default)]
pub struct MemoryHost {
    nodes: HashMap<HostNodeId, MemoryNode>,
    page: Vec<HostNodeId>,
    selection: Vec<HostNodeId>,
    viewport_focus: Vec<HostNodeId>,
    next_id: u64,
    available_fonts: Option<HashSet<FontName>>,
    loaded_fonts: HashSet<FontName>,
    failing_images: HashSet<String>,
    ops: Vec<HostOp>,
}

impl MemoryHost {
    /// Host where every font exists and every image loads.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict the fonts the host can load.
    #[must_use]
    pub fn with_available_fonts(mut self, fonts: impl IntoIterator<Item = FontName>) -> Self {
        self.available_fonts = Some(fonts.into_iter().collect());
        self
    }

    /// Make fetches of `url` fail.
    #[must_use]
    pub fn with_failing_image(mut self, url: impl Into<String>) -> Self {
        self.failing_images.insert(url.into());
        self
    }

    /// Get a node by handle.
    #[must_use]
    pub fn node(&self, id: HostNodeId) -> Option<&MemoryNode> {
        self.nodes.get(&id)
    }

    /// Child handles of a node, in order.
    #[must_use]
    pub fn children(&self, id: HostNodeId) -> &[HostNodeId] {
        self.nodes.get(&id).map_or(&[], |n| n.children.as_slice())
    }

    /// Top-level nodes on the page.
    #[must_use]
    pub fn page(&self) -> &[HostNodeId] {
        &self.page
    }

    /// Current selection.
    #[must_use]
    pub fn selection(&self) -> &[HostNodeId] {
        &self.selection
    }

    /// Nodes the viewport was last focused on.
    #[must_use]
    pub fn viewport_focus(&self) -> &[HostNodeId] {
        &self.viewport_focus
    }

    /// Number of live nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the scene holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The operation log.
    #[must_use]
    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    /// How many times a font load was requested.
    #[must_use]
    pub fn font_load_count(&self, font: &FontName) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, HostOp::LoadFont(f) if f == font))
            .count()
    }

    /// Subtree rooted at `id`.
    #[must_use]
    pub fn tree(&self, id: HostNodeId) -> Option<SceneTree> {
        let node = self.nodes.get(&id)?;
        Some(SceneTree {
            node: node.clone(),
            children: node
                .children
                .iter()
                .filter_map(|child| self.tree(*child))
                .collect(),
        })
    }

    /// Every top-level subtree, in page order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SceneTree> {
        self.page.iter().filter_map(|id| self.tree(*id)).collect()
    }

    fn get(&self, id: HostNodeId) -> HostResult<&MemoryNode> {
        self.nodes.get(&id).ok_or(HostError::NodeNotFound(id))
    }

    fn get_mut(&mut self, id: HostNodeId) -> HostResult<&mut MemoryNode> {
        self.nodes.get_mut(&id).ok_or(HostError::NodeNotFound(id))
    }

    fn expect_kind(
        &mut self,
        id: HostNodeId,
        kind: HostNodeKind,
        operation: &'static str,
    ) -> HostResult<&mut MemoryNode> {
        let node = self.get_mut(id)?;
        if node.kind == kind {
            Ok(node)
        } else {
            Err(HostError::Unsupported {
                node: id,
                kind: node.kind,
                operation,
            })
        }
    }

    fn create(&mut self, kind: HostNodeKind) -> HostNodeId {
        self.next_id += 1;
        let id = HostNodeId(self.next_id);
        self.nodes.insert(id, MemoryNode::new(id, kind));
        self.ops.push(HostOp::Create(id, kind));
        id
    }

    fn detach(&mut self, id: HostNodeId) -> HostResult<()> {
        let attachment = self.get(id)?.attachment;
        match attachment {
            Attachment::Detached => {}
            Attachment::Page => self.page.retain(|&p| p != id),
            Attachment::Parent(parent) => {
                if let Some(parent) = self.nodes.get_mut(&parent) {
                    parent.children.retain(|&c| c != id);
                }
            }
        }
        self.get_mut(id)?.attachment = Attachment::Detached;
        Ok(())
    }

    fn parent_layout(&self, node: &MemoryNode) -> LayoutMode {
        match node.attachment {
            Attachment::Parent(parent) => self
                .nodes
                .get(&parent)
                .map_or(LayoutMode::None, |p| p.layout_mode),
            Attachment::Detached | Attachment::Page => LayoutMode::None,
        }
    }
}

#[async_trait]
impl SceneHost for MemoryHost {
    fn create_frame(&mut self) -> HostResult<HostNodeId> {
        Ok(self.create(HostNodeKind::Frame))
    }

    fn create_text(&mut self) -> HostResult<HostNodeId> {
        Ok(self.create(HostNodeKind::Text))
    }

    fn create_rectangle(&mut self) -> HostResult<HostNodeId> {
        Ok(self.create(HostNodeKind::Rectangle))
    }

    fn remove(&mut self, node: HostNodeId) -> HostResult<()> {
        self.detach(node)?;
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            if let Some(removed) = self.nodes.remove(&id) {
                stack.extend(removed.children);
            }
        }
        self.selection.retain(|id| self.nodes.contains_key(id));
        self.viewport_focus.retain(|id| self.nodes.contains_key(id));
        self.ops.push(HostOp::Remove(node));
        Ok(())
    }

    fn set_name(&mut self, node: HostNodeId, name: &str) -> HostResult<()> {
        self.get_mut(node)?.name = name.to_string();
        Ok(())
    }

    fn resize(&mut self, node: HostNodeId, width: f64, height: f64) -> HostResult<()> {
        let node = self.get_mut(node)?;
        node.width = width;
        node.height = height;
        Ok(())
    }

    fn append_child(&mut self, parent: HostNodeId, child: HostNodeId) -> HostResult<()> {
        if parent == child {
            return Err(HostError::InvalidOperation(format!(
                "cannot append {child} to itself"
            )));
        }
        self.expect_kind(parent, HostNodeKind::Frame, "append_child")?;
        self.detach(child)?;
        self.get_mut(child)?.attachment = Attachment::Parent(parent);
        self.get_mut(parent)?.children.push(child);
        self.ops.push(HostOp::Attach {
            node: child,
            parent: Some(parent),
        });
        Ok(())
    }

    fn append_to_page(&mut self, node: HostNodeId) -> HostResult<()> {
        self.detach(node)?;
        self.get_mut(node)?.attachment = Attachment::Page;
        self.page.push(node);
        self.ops.push(HostOp::Attach { node, parent: None });
        Ok(())
    }

    fn set_layout_mode(&mut self, node: HostNodeId, mode: LayoutMode) -> HostResult<()> {
        self.expect_kind(node, HostNodeKind::Frame, "layout_mode")?
            .layout_mode = mode;
        Ok(())
    }

    fn set_padding(&mut self, node: HostNodeId, padding: Padding) -> HostResult<()> {
        self.expect_kind(node, HostNodeKind::Frame, "padding")?.padding = padding;
        Ok(())
    }

    fn set_item_spacing(&mut self, node: HostNodeId, spacing: f64) -> HostResult<()> {
        self.expect_kind(node, HostNodeKind::Frame, "item_spacing")?
            .item_spacing = spacing;
        Ok(())
    }

    fn set_primary_axis_align(
        &mut self,
        node: HostNodeId,
        align: PrimaryAxisAlign,
    ) -> HostResult<()> {
        self.expect_kind(node, HostNodeKind::Frame, "primary_axis_align")?
            .primary_axis_align = align;
        Ok(())
    }

    fn set_counter_axis_align(
        &mut self,
        node: HostNodeId,
        align: CounterAxisAlign,
    ) -> HostResult<()> {
        self.expect_kind(node, HostNodeKind::Frame, "counter_axis_align")?
            .counter_axis_align = align;
        Ok(())
    }

    fn set_layout_wrap(&mut self, node: HostNodeId, wrap: bool) -> HostResult<()> {
        let frame = self.expect_kind(node, HostNodeKind::Frame, "layout_wrap")?;
        if wrap && frame.layout_mode != LayoutMode::Horizontal {
            return Err(HostError::InvalidOperation(format!(
                "wrap requires a horizontal layout on {node}"
            )));
        }
        frame.wrap = wrap;
        Ok(())
    }

    fn set_layout_sizing(
        &mut self,
        node: HostNodeId,
        axis: Axis,
        sizing: AxisSizing,
    ) -> HostResult<()> {
        let current = self.get(node)?;
        if current.attachment == Attachment::Detached {
            return Err(HostError::NotAttached(node));
        }

        let allowed = match sizing {
            AxisSizing::Fixed => true,
            AxisSizing::Hug => {
                current.kind == HostNodeKind::Text || current.layout_mode != LayoutMode::None
            }
            AxisSizing::Fill => self.parent_layout(current) != LayoutMode::None,
        };
        if !allowed {
            return Err(HostError::InvalidOperation(format!(
                "{sizing:?} sizing is not valid for {node} on the {axis} axis"
            )));
        }

        let target = self.get_mut(node)?;
        match axis {
            Axis::Horizontal => target.sizing_horizontal = sizing,
            Axis::Vertical => target.sizing_vertical = sizing,
        }
        self.ops.push(HostOp::SetSizing(node, axis, sizing));
        Ok(())
    }

    fn supports_size_bounds(&self, node: HostNodeId) -> bool {
        self.nodes.get(&node).is_some_and(|n| {
            n.layout_mode != LayoutMode::None || self.parent_layout(n) != LayoutMode::None
        })
    }

    fn set_size_bounds(&mut self, node: HostNodeId, bounds: SizeBounds) -> HostResult<()> {
        if !self.supports_size_bounds(node) {
            let kind = self.get(node)?.kind;
            return Err(HostError::Unsupported {
                node,
                kind,
                operation: "size_bounds",
            });
        }
        self.get_mut(node)?.bounds = bounds;
        Ok(())
    }

    fn set_fills(&mut self, node: HostNodeId, fills: Vec<Paint>) -> HostResult<()> {
        self.get_mut(node)?.fills = fills;
        Ok(())
    }

    fn set_strokes(
        &mut self,
        node: HostNodeId,
        strokes: Vec<Paint>,
        weight: f64,
        align: Option<StrokeAlign>,
    ) -> HostResult<()> {
        let node = self.get_mut(node)?;
        node.strokes = strokes;
        node.stroke_weight = weight;
        if align.is_some() {
            node.stroke_align = align;
        }
        Ok(())
    }

    fn set_effects(&mut self, node: HostNodeId, effects: Vec<Effect>) -> HostResult<()> {
        self.get_mut(node)?.effects = effects;
        Ok(())
    }

    fn set_corner_radii(&mut self, node: HostNodeId, radii: CornerRadii) -> HostResult<()> {
        let target = self.get_mut(node)?;
        if target.kind == HostNodeKind::Text {
            return Err(HostError::Unsupported {
                node,
                kind: target.kind,
                operation: "corner_radii",
            });
        }
        target.corner_radii = radii;
        Ok(())
    }

    fn set_opacity(&mut self, node: HostNodeId, opacity: f64) -> HostResult<()> {
        self.get_mut(node)?.opacity = opacity;
        Ok(())
    }

    async fn load_font(&mut self, font: &FontName) -> HostResult<()> {
        self.ops.push(HostOp::LoadFont(font.clone()));
        let available = self
            .available_fonts
            .as_ref()
            .map_or(true, |fonts| fonts.contains(font));
        if !available {
            return Err(HostError::FontUnavailable(font.clone()));
        }
        self.loaded_fonts.insert(font.clone());
        Ok(())
    }

    fn set_font_name(&mut self, node: HostNodeId, font: &FontName) -> HostResult<()> {
        if !self.loaded_fonts.contains(font) {
            return Err(HostError::FontNotLoaded(font.clone()));
        }
        self.expect_kind(node, HostNodeKind::Text, "font_name")?.font = Some(font.clone());
        self.ops.push(HostOp::SetFont(node));
        Ok(())
    }

    fn set_characters(&mut self, node: HostNodeId, characters: &str) -> HostResult<()> {
        let text = self.expect_kind(node, HostNodeKind::Text, "characters")?;
        let font = text
            .font
            .clone()
            .ok_or_else(|| HostError::InvalidOperation(format!("no font bound to {node}")))?;
        if !self.loaded_fonts.contains(&font) {
            return Err(HostError::FontNotLoaded(font));
        }
        self.get_mut(node)?.characters = Some(characters.to_string());
        self.ops.push(HostOp::SetCharacters(node));
        Ok(())
    }

    fn set_font_size(&mut self, node: HostNodeId, size: f64) -> HostResult<()> {
        self.expect_kind(node, HostNodeKind::Text, "font_size")?
            .font_size = Some(size);
        Ok(())
    }

    fn set_line_height(&mut self, node: HostNodeId, pixels: f64) -> HostResult<()> {
        self.expect_kind(node, HostNodeKind::Text, "line_height")?
            .line_height = Some(pixels);
        Ok(())
    }

    fn set_text_align(&mut self, node: HostNodeId, align: TextAlignHorizontal) -> HostResult<()> {
        self.expect_kind(node, HostNodeKind::Text, "text_align")?
            .text_align = Some(align);
        Ok(())
    }

    async fn create_image(&mut self, url: &str) -> HostResult<ImageHandle> {
        self.ops.push(HostOp::FetchImage(url.to_string()));
        let fetchable = url.starts_with("https://") || url.starts_with("http://");
        if !fetchable || self.failing_images.contains(url) {
            return Err(HostError::ImageFetch {
                url: url.to_string(),
                reason: "fetch failed".to_string(),
            });
        }
        Ok(ImageHandle(format!("image-{}", self.ops.len())))
    }

    fn set_position(&mut self, node: HostNodeId, x: f64, y: f64) -> HostResult<()> {
        let node = self.get_mut(node)?;
        node.x = x;
        node.y = y;
        Ok(())
    }

    fn set_selection(&mut self, nodes: &[HostNodeId]) -> HostResult<()> {
        for id in nodes {
            self.get(*id)?;
        }
        self.selection = nodes.to_vec();
        Ok(())
    }

    fn focus_viewport(&mut self, nodes: &[HostNodeId]) -> HostResult<()> {
        for id in nodes {
            self.get(*id)?;
        }
        self.viewport_focus = nodes.to_vec();
        Ok(())
    }
}
