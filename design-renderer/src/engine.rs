//! Render engine.
//!
//! Walks a verified [`Document`] depth-first and drives a [`SceneHost`].
//! Per node the order is fixed:
//!
//! ```text
//! container  create → name → size → clear fills → layout → style → attach → sizing → children
//! text       create → name → font → characters → size/line height → color/align → attach → sizing
//! rectangle  create → name → size → style → attach → sizing
//! image      create → name → size → image or placeholder fill → radius → attach → sizing
//! ```
//!
//! A parent is attached before any of its children exist, so every sizing
//! call sees an attached node and a parent whose layout mode is final.
//!
//! If anything fails, the partially built tree is removed from the host
//! before the error is returned.

use std::fmt;

use design_core::{
    Color, Document, Fill, ImageContent, ImageNode, Node, NodeProps, NodeStyle, RectangleNode,
    ScaleMode, Shadow, ShadowKind, SizingMode, StrokePosition, TextAlign, TextNode,
};
use futures::future::BoxFuture;

use crate::config::RenderConfig;
use crate::error::RenderResult;
use crate::fonts::{font_name, FontCache};
use crate::host::{
    Axis, CornerRadii, Effect, EffectKind, FontName, GradientTransform, HostNodeId, HostResult,
    ImageScaleMode, LayoutMode, Paint, PaintStop, SceneHost, StrokeAlign, TextAlignHorizontal,
};
use crate::layout::{
    self, apply_layout, resolve_layout, resolve_sizing, NodeCapabilities, ParentContext,
    SkipReason,
};

/// A degradation that did not abort the render.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderWarning {
    /// The requested font was unavailable.
    FontFallback {
        /// Node name.
        node: String,
        /// Requested font.
        requested: FontName,
        /// Font used instead.
        used: FontName,
    },
    /// The image could not be fetched; the placeholder was used.
    ImageFallback {
        /// Node name.
        node: String,
        /// Image URL.
        url: String,
        /// Host-supplied reason.
        reason: String,
    },
    /// A sizing mode was not valid in the node's context.
    SizingSkipped {
        /// Node name.
        node: String,
        /// Axis.
        axis: Axis,
        /// Requested mode.
        mode: SizingMode,
        /// Reason.
        reason: SkipReason,
    },
}

impl fmt::Display for RenderWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FontFallback {
                node,
                requested,
                used,
            } => write!(f, "{node}: font {requested} unavailable, used {used}"),
            Self::ImageFallback { node, url, reason } => {
                write!(f, "{node}: image {url} failed ({reason}), used placeholder")
            }
            Self::SizingSkipped {
                node,
                axis,
                mode,
                reason,
            } => write!(f, "{node}: {mode} sizing on the {axis} axis skipped: {reason}"),
        }
    }
}

/// Result of a successful render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    /// Host handle of the root node.
    pub root: HostNodeId,
    /// Number of host nodes created.
    pub nodes: usize,
    /// Degradations along the way.
    pub warnings: Vec<RenderWarning>,
}

#[derive(Debug, Clone, Copy)]
struct Placement {
    parent: Option<HostNodeId>,
    context: ParentContext,
}

impl Placement {
    const PAGE: Self = Self {
        parent: None,
        context: ParentContext::PAGE,
    };
}

/// One render pass over one document.
pub struct RenderEngine<'a, H: SceneHost + ?Sized> {
    host: &'a mut H,
    fonts: &'a mut FontCache,
    config: &'a RenderConfig,
    warnings: Vec<RenderWarning>,
    root: Option<HostNodeId>,
    detached: Option<HostNodeId>,
    nodes: usize,
}

/// Render `document` into `host`.
///
/// # Errors
///
/// See [`RenderEngine::render`].
pub async fn render<H: SceneHost + ?Sized>(
    host: &mut H,
    fonts: &mut FontCache,
    config: &RenderConfig,
    document: &Document,
) -> RenderResult<RenderOutcome> {
    RenderEngine::new(host, fonts, config).render(document).await
}

impl<'a, H: SceneHost + ?Sized> RenderEngine<'a, H> {
    /// Create an engine borrowing a host, a font cache and a configuration.
    #[must_use]
    pub fn new(host: &'a mut H, fonts: &'a mut FontCache, config: &'a RenderConfig) -> Self {
        Self {
            host,
            fonts,
            config,
            warnings: Vec::new(),
            root: None,
            detached: None,
            nodes: 0,
        }
    }

    /// Render the document, then place the root at the origin, select it and
    /// focus the viewport on it.
    ///
    /// # Errors
    ///
    /// Fails when the host rejects an operation or the default font cannot be
    /// loaded. The partial tree is removed first.
    pub async fn render(mut self, document: &Document) -> RenderResult<RenderOutcome> {
        tracing::info!(
            name = %document.meta.name,
            nodes = document.root.count(),
            "Starting render"
        );

        let preload = self.config.preload_fonts.clone();
        self.fonts.preload(&mut *self.host, &preload).await;

        match self.render_tree(document).await {
            Ok(root) => {
                tracing::info!(
                    root = %root,
                    created = self.nodes,
                    warnings = self.warnings.len(),
                    "Render complete"
                );
                Ok(RenderOutcome {
                    root,
                    nodes: self.nodes,
                    warnings: self.warnings,
                })
            }
            Err(e) => {
                tracing::error!("Render failed: {}", e);
                let detached = self.detached.take().filter(|&id| Some(id) != self.root);
                for node in detached.into_iter().chain(self.root.take()) {
                    if let Err(cleanup) = self.host.remove(node) {
                        tracing::warn!("Failed to remove partial tree {}: {}", node, cleanup);
                    }
                }
                Err(e)
            }
        }
    }

    async fn render_tree(&mut self, document: &Document) -> RenderResult<HostNodeId> {
        let root = self.render_node(&document.root, Placement::PAGE).await?;

        self.host.set_position(root, 0.0, 0.0)?;
        self.host.set_selection(&[root])?;
        self.host.focus_viewport(&[root])?;
        Ok(root)
    }

    fn render_node<'s>(
        &'s mut self,
        node: &'s Node,
        placement: Placement,
    ) -> BoxFuture<'s, RenderResult<HostNodeId>> {
        Box::pin(async move {
            match node {
                Node::Frame(frame) => {
                    self.render_container(&frame.props, &frame.children, "Frame", placement)
                        .await
                }
                Node::Component(component) => {
                    self.render_container(
                        &component.props,
                        &component.children,
                        "Component",
                        placement,
                    )
                    .await
                }
                Node::Text(text) => self.render_text(text, placement).await,
                Node::Rectangle(rectangle) => self.render_rectangle(rectangle, placement),
                Node::Image(image) => self.render_image(image, placement).await,
            }
        })
    }

    async fn render_container(
        &mut self,
        props: &NodeProps,
        children: &[Node],
        default_name: &str,
        placement: Placement,
    ) -> RenderResult<HostNodeId> {
        let label = props.name.as_deref().unwrap_or(default_name);
        tracing::debug!(name = label, children = children.len(), "Rendering container");

        let id = self.host.create_frame()?;
        self.track(id, placement);
        self.host.set_name(id, label)?;
        self.apply_explicit_size(id, props)?;
        self.host.set_fills(id, Vec::new())?;

        let layout = props.layout.as_ref().map(resolve_layout);
        if let Some(layout) = &layout {
            apply_layout(&mut *self.host, id, layout)?;
        }
        self.apply_style(id, props.style.as_ref())?;
        self.attach(id, placement)?;

        let auto_layout = layout.is_some_and(|l| l.mode != LayoutMode::None);
        self.apply_sizing(id, label, props, placement, auto_layout)?;

        let child_placement = Placement {
            parent: Some(id),
            context: layout.map(|l| l.child_context()).unwrap_or_default(),
        };
        for child in children {
            self.render_node(child, child_placement).await?;
        }

        Ok(id)
    }

    async fn render_text(&mut self, node: &TextNode, placement: Placement) -> RenderResult<HostNodeId> {
        let label = node.props.name.as_deref().unwrap_or("Text");
        tracing::debug!(name = label, "Rendering text");

        let id = self.host.create_text()?;
        self.track(id, placement);
        self.host.set_name(id, label)?;

        let typography = node.text.typography.unwrap_or_default();
        let acquired = self
            .fonts
            .acquire(&mut *self.host, typography.family, typography.weight)
            .await?;
        if acquired.fallback {
            self.warnings.push(RenderWarning::FontFallback {
                node: label.to_string(),
                requested: font_name(typography.family, typography.weight),
                used: acquired.font.clone(),
            });
        }

        // Content only after the font is bound.
        self.host.set_font_name(id, &acquired.font)?;
        self.host.set_characters(id, &node.text.content)?;
        self.host.set_font_size(id, typography.size)?;
        if let Some(multiplier) = typography.line_height {
            self.host.set_line_height(id, multiplier * typography.size)?;
        }
        self.apply_explicit_size(id, &node.props)?;

        if let Some(color) = &node.text.color {
            self.host.set_fills(id, vec![solid(color)])?;
        }
        if let Some(align) = node.text.align {
            self.host.set_text_align(id, text_align(align))?;
        }

        self.attach(id, placement)?;
        self.apply_sizing(id, label, &node.props, placement, true)?;
        Ok(id)
    }

    fn render_rectangle(
        &mut self,
        node: &RectangleNode,
        placement: Placement,
    ) -> RenderResult<HostNodeId> {
        let label = node.props.name.as_deref().unwrap_or("Rectangle");
        tracing::debug!(name = label, "Rendering rectangle");

        let id = self.host.create_rectangle()?;
        self.track(id, placement);
        self.host.set_name(id, label)?;
        self.apply_explicit_size(id, &node.props)?;
        self.apply_style(id, node.props.style.as_ref())?;
        self.attach(id, placement)?;
        self.apply_sizing(id, label, &node.props, placement, false)?;
        Ok(id)
    }

    async fn render_image(
        &mut self,
        node: &ImageNode,
        placement: Placement,
    ) -> RenderResult<HostNodeId> {
        let label = node.props.name.as_deref().unwrap_or("Image");
        tracing::debug!(name = label, "Rendering image");

        let id = self.host.create_rectangle()?;
        self.track(id, placement);
        self.host.set_name(id, label)?;
        self.apply_explicit_size(id, &node.props)?;

        let paint = self.image_paint(label, &node.image).await;
        self.host.set_fills(id, vec![paint])?;

        let radius = node.props.style.as_ref().and_then(|s| s.corner_radius);
        if let Some(radius) = radius {
            self.host
                .set_corner_radii(id, CornerRadii::from(radius.expand()))?;
        }

        self.attach(id, placement)?;
        self.apply_sizing(id, label, &node.props, placement, false)?;
        Ok(id)
    }

    async fn image_paint(&mut self, label: &str, image: &ImageContent) -> Paint {
        let placeholder = solid(&self.config.placeholder_color);
        if image.placeholder == Some(true) {
            return placeholder;
        }
        let Some(url) = image.url.as_deref() else {
            return placeholder;
        };

        match self.host.create_image(url).await {
            Ok(handle) => Paint::Image {
                handle,
                scale_mode: scale_mode(image.scale_mode.unwrap_or(ScaleMode::Fill)),
            },
            Err(e) => {
                tracing::warn!("Failed to load image {}, using placeholder: {}", url, e);
                self.warnings.push(RenderWarning::ImageFallback {
                    node: label.to_string(),
                    url: url.to_string(),
                    reason: e.to_string(),
                });
                placeholder
            }
        }
    }

    /// Record a freshly created node. It stays the detached node until
    /// [`Self::attach`] succeeds.
    fn track(&mut self, id: HostNodeId, placement: Placement) {
        self.nodes += 1;
        self.detached = Some(id);
        if placement.parent.is_none() && self.root.is_none() {
            self.root = Some(id);
        }
    }

    fn attach(&mut self, id: HostNodeId, placement: Placement) -> HostResult<()> {
        match placement.parent {
            Some(parent) => self.host.append_child(parent, id)?,
            None => self.host.append_to_page(id)?,
        }
        if self.detached == Some(id) {
            self.detached = None;
        }
        Ok(())
    }

    /// Explicit dimensions are applied only when both are positive.
    fn apply_explicit_size(&mut self, id: HostNodeId, props: &NodeProps) -> HostResult<()> {
        match (props.width, props.height) {
            (Some(width), Some(height)) if width > 0.0 && height > 0.0 => {
                self.host.resize(id, width, height)
            }
            _ => Ok(()),
        }
    }

    fn apply_sizing(
        &mut self,
        id: HostNodeId,
        label: &str,
        props: &NodeProps,
        placement: Placement,
        can_hug: bool,
    ) -> HostResult<()> {
        let resolved = resolve_sizing(
            props.sizing.as_ref(),
            placement.context,
            NodeCapabilities { can_hug },
        );

        for skipped in &resolved.skipped {
            tracing::warn!(
                "{}: {} sizing on the {} axis skipped: {}",
                label,
                skipped.mode,
                skipped.axis,
                skipped.reason
            );
            self.warnings.push(RenderWarning::SizingSkipped {
                node: label.to_string(),
                axis: skipped.axis,
                mode: skipped.mode,
                reason: skipped.reason,
            });
        }

        layout::apply_sizing(&mut *self.host, id, &resolved)
    }

    fn apply_style(&mut self, id: HostNodeId, style: Option<&NodeStyle>) -> HostResult<()> {
        let Some(style) = style else {
            return Ok(());
        };

        if let Some(fill) = &style.fill {
            let paint = self.fill_paint(fill);
            self.host.set_fills(id, vec![paint])?;
        }
        if let Some(radius) = style.corner_radius {
            self.host
                .set_corner_radii(id, CornerRadii::from(radius.expand()))?;
        }
        if let Some(opacity) = style.opacity {
            self.host.set_opacity(id, opacity)?;
        }
        if let Some(stroke) = &style.stroke {
            self.host.set_strokes(
                id,
                vec![solid(&stroke.color)],
                stroke.weight,
                stroke.position.map(stroke_align),
            )?;
        }
        if let Some(shadow) = &style.shadow {
            let effect = self.shadow_effect(shadow);
            self.host.set_effects(id, vec![effect])?;
        }
        Ok(())
    }

    fn fill_paint(&self, fill: &Fill) -> Paint {
        match fill {
            Fill::Solid { color } => solid(color),
            Fill::Gradient { stops, angle } => Paint::GradientLinear {
                stops: stops
                    .iter()
                    .map(|stop| PaintStop {
                        color: stop.color.to_rgba(),
                        position: stop.position,
                    })
                    .collect(),
                transform: gradient_transform(angle.unwrap_or(self.config.default_gradient_angle)),
            },
        }
    }

    fn shadow_effect(&self, shadow: &Shadow) -> Effect {
        let mut color = shadow.color.to_rgba();
        if !shadow.color.has_alpha() {
            color.a = self.config.shadow_alpha;
        }

        Effect {
            kind: match shadow.kind {
                ShadowKind::Drop => EffectKind::DropShadow,
                ShadowKind::Inner => EffectKind::InnerShadow,
            },
            color,
            offset: (shadow.offset_x, shadow.offset_y),
            radius: shadow.blur,
            spread: shadow.spread.unwrap_or(0.0),
        }
    }
}

fn solid(color: &Color) -> Paint {
    Paint::Solid {
        color: color.to_rgba(),
    }
}

fn stroke_align(position: StrokePosition) -> StrokeAlign {
    match position {
        StrokePosition::Inside => StrokeAlign::Inside,
        StrokePosition::Outside => StrokeAlign::Outside,
        StrokePosition::Center => StrokeAlign::Center,
    }
}

fn text_align(align: TextAlign) -> TextAlignHorizontal {
    match align {
        TextAlign::Left => TextAlignHorizontal::Left,
        TextAlign::Center => TextAlignHorizontal::Center,
        TextAlign::Right => TextAlignHorizontal::Right,
    }
}

fn scale_mode(mode: ScaleMode) -> ImageScaleMode {
    match mode {
        ScaleMode::Fill => ImageScaleMode::Fill,
        ScaleMode::Fit => ImageScaleMode::Fit,
        ScaleMode::Crop => ImageScaleMode::Crop,
        ScaleMode::Tile => ImageScaleMode::Tile,
    }
}

/// Gradient placement for a CSS-style angle in degrees.
///
/// 90° runs left to right (the identity transform), 180° top to bottom. The
/// rotation is about the center of the unit square.
#[must_use]
pub fn gradient_transform(angle: f64) -> GradientTransform {
    let (sin, cos) = (angle - 90.0).to_radians().sin_cos();
    [
        [cos, sin, 0.5 - 0.5 * cos - 0.5 * sin],
        [-sin, cos, 0.5 + 0.5 * sin - 0.5 * cos],
    ]
}
