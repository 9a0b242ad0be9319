//! Layout and sizing resolution.
//!
//! Resolution is split from application. [`resolve_layout`] and
//! [`resolve_sizing`] are pure functions of the document and the parent
//! context; [`apply_layout`] and [`apply_sizing`] push the result to a host.
//!
//! Sizing is the second phase of a node's lifecycle: the engine creates a
//! node, sets fixed dimensions, attaches it, and only then calls
//! [`apply_sizing`], because hosts reject per-axis sizing modes on detached
//! nodes.

use design_core::{CrossAlign, Direction, LayoutConfig, MainAlign, SizingConfig, SizingMode};

use crate::host::{
    Axis, AxisSizing, CounterAxisAlign, HostNodeId, HostResult, LayoutMode, Padding,
    PrimaryAxisAlign, SceneHost, SizeBounds,
};

/// Concrete auto-layout parameters for one container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLayout {
    /// Host layout mode.
    pub mode: LayoutMode,
    /// Padding, when given.
    pub padding: Option<Padding>,
    /// Gap, when given.
    pub item_spacing: Option<f64>,
    /// Primary-axis alignment.
    pub primary_align: PrimaryAxisAlign,
    /// Cross-axis alignment.
    pub counter_align: CounterAxisAlign,
    /// Wrap children (horizontal only).
    pub wrap: bool,
    /// Cross-align was `stretch`: children without sizing fill the cross axis.
    pub stretch_children: bool,
}

impl ResolvedLayout {
    /// The context children of this container are sized in.
    #[must_use]
    pub fn child_context(&self) -> ParentContext {
        ParentContext {
            mode: self.mode,
            stretch: self.stretch_children,
        }
    }
}

/// The layout a node is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParentContext {
    /// Parent auto-layout mode (`None` for the page or free frames).
    pub mode: LayoutMode,
    /// Parent asked for stretched children.
    pub stretch: bool,
}

impl ParentContext {
    /// Top-level placement on the page.
    pub const PAGE: Self = Self {
        mode: LayoutMode::None,
        stretch: false,
    };

    /// Whether the parent lays out its children.
    #[must_use]
    pub fn is_auto_layout(&self) -> bool {
        self.mode != LayoutMode::None
    }

    /// The axis perpendicular to the parent's flow.
    #[must_use]
    pub fn cross_axis(&self) -> Option<Axis> {
        match self.mode {
            LayoutMode::Horizontal => Some(Axis::Vertical),
            LayoutMode::Vertical => Some(Axis::Horizontal),
            LayoutMode::None => None,
        }
    }
}

/// Map a layout config onto host primitives.
#[must_use]
pub fn resolve_layout(layout: &LayoutConfig) -> ResolvedLayout {
    let mode = match layout.direction {
        Direction::Horizontal => LayoutMode::Horizontal,
        Direction::Vertical => LayoutMode::Vertical,
        Direction::None => LayoutMode::None,
    };

    if mode == LayoutMode::None {
        return ResolvedLayout {
            mode,
            padding: None,
            item_spacing: None,
            primary_align: PrimaryAxisAlign::Min,
            counter_align: CounterAxisAlign::Min,
            wrap: false,
            stretch_children: false,
        };
    }

    let primary_align = match layout.align() {
        MainAlign::Start => PrimaryAxisAlign::Min,
        MainAlign::Center => PrimaryAxisAlign::Center,
        MainAlign::End => PrimaryAxisAlign::Max,
        MainAlign::SpaceBetween => PrimaryAxisAlign::SpaceBetween,
    };

    // No host stretch primitive: align to start and let children fill.
    let (counter_align, stretch_children) = match layout.cross_align() {
        CrossAlign::Start => (CounterAxisAlign::Min, false),
        CrossAlign::Center => (CounterAxisAlign::Center, false),
        CrossAlign::End => (CounterAxisAlign::Max, false),
        CrossAlign::Stretch => (CounterAxisAlign::Min, true),
    };

    ResolvedLayout {
        mode,
        padding: layout.padding.map(|p| Padding::from(p.expand())),
        item_spacing: layout.gap,
        primary_align,
        counter_align,
        wrap: layout.wrap == Some(true) && mode == LayoutMode::Horizontal,
        stretch_children,
    }
}

/// Push a resolved layout to the host.
///
/// # Errors
///
/// Propagates host failures.
pub fn apply_layout<H: SceneHost + ?Sized>(
    host: &mut H,
    node: HostNodeId,
    layout: &ResolvedLayout,
) -> HostResult<()> {
    host.set_layout_mode(node, layout.mode)?;
    if layout.mode == LayoutMode::None {
        return Ok(());
    }

    if let Some(padding) = layout.padding {
        host.set_padding(node, padding)?;
    }
    if let Some(spacing) = layout.item_spacing {
        host.set_item_spacing(node, spacing)?;
    }
    host.set_primary_axis_align(node, layout.primary_align)?;
    host.set_counter_axis_align(node, layout.counter_align)?;
    if layout.wrap {
        host.set_layout_wrap(node, true)?;
    }
    Ok(())
}

/// Why a requested sizing mode was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `fill` needs an auto-layout parent.
    FillOutsideAutoLayout,
    /// `hug` needs a text node or an auto-layout container.
    HugWithoutContent,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::FillOutsideAutoLayout => "fill requires an auto-layout parent",
            Self::HugWithoutContent => "hug requires a text node or an auto-layout container",
        })
    }
}

/// A sizing mode that was dropped during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkippedSizing {
    /// Axis.
    pub axis: Axis,
    /// Requested mode.
    pub mode: SizingMode,
    /// Reason.
    pub reason: SkipReason,
}

/// Concrete sizing for one node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedSizing {
    /// Horizontal mode to set, if any.
    pub horizontal: Option<AxisSizing>,
    /// Vertical mode to set, if any.
    pub vertical: Option<AxisSizing>,
    /// Bounds to set, if any.
    pub bounds: Option<SizeBounds>,
    /// Modes that could not be honored.
    pub skipped: Vec<SkippedSizing>,
}

/// What the node itself can do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeCapabilities {
    /// Text nodes and auto-layout containers can hug their content.
    pub can_hug: bool,
}

/// Resolve a node's per-axis sizing in its parent context.
///
/// Without explicit sizing, a child of a `stretch` container fills the
/// parent's cross axis and keeps its size on the other axis.
#[must_use]
pub fn resolve_sizing(
    sizing: Option<&SizingConfig>,
    parent: ParentContext,
    node: NodeCapabilities,
) -> ResolvedSizing {
    let Some(sizing) = sizing else {
        let mut resolved = ResolvedSizing::default();
        if parent.stretch {
            match parent.cross_axis() {
                Some(Axis::Horizontal) => resolved.horizontal = Some(AxisSizing::Fill),
                Some(Axis::Vertical) => resolved.vertical = Some(AxisSizing::Fill),
                None => {}
            }
        }
        return resolved;
    };

    let mut skipped = Vec::new();
    let mut axis_mode = |axis: Axis, mode: SizingMode| -> Option<AxisSizing> {
        let reason = match mode {
            SizingMode::Fixed => return Some(AxisSizing::Fixed),
            SizingMode::Hug if node.can_hug => return Some(AxisSizing::Hug),
            SizingMode::Fill if parent.is_auto_layout() => return Some(AxisSizing::Fill),
            SizingMode::Hug => SkipReason::HugWithoutContent,
            SizingMode::Fill => SkipReason::FillOutsideAutoLayout,
        };
        skipped.push(SkippedSizing { axis, mode, reason });
        None
    };

    let horizontal = axis_mode(Axis::Horizontal, sizing.width);
    let vertical = axis_mode(Axis::Vertical, sizing.height);

    let bounds = SizeBounds {
        min_width: sizing.min_width,
        max_width: sizing.max_width,
        min_height: sizing.min_height,
        max_height: sizing.max_height,
    };

    ResolvedSizing {
        horizontal,
        vertical,
        bounds: (!bounds.is_empty()).then_some(bounds),
        skipped,
    }
}

/// Push resolved sizing to the host. The node must already be attached.
///
/// Bounds are applied only when the host supports them for this node.
///
/// # Errors
///
/// Propagates host failures, including [`HostError::NotAttached`](crate::HostError::NotAttached).
pub fn apply_sizing<H: SceneHost + ?Sized>(
    host: &mut H,
    node: HostNodeId,
    sizing: &ResolvedSizing,
) -> HostResult<()> {
    if let Some(mode) = sizing.horizontal {
        host.set_layout_sizing(node, Axis::Horizontal, mode)?;
    }
    if let Some(mode) = sizing.vertical {
        host.set_layout_sizing(node, Axis::Vertical, mode)?;
    }
    if let Some(bounds) = sizing.bounds {
        if host.supports_size_bounds(node) {
            host.set_size_bounds(node, bounds)?;
        } else {
            tracing::debug!("Node {} does not support size bounds", node);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use design_core::Spacing;

    fn layout(direction: Direction) -> LayoutConfig {
        LayoutConfig {
            direction,
            align: None,
            cross_align: None,
            gap: None,
            padding: None,
            wrap: None,
        }
    }

    const TEXT: NodeCapabilities = NodeCapabilities { can_hug: true };
    const SHAPE: NodeCapabilities = NodeCapabilities { can_hug: false };

    #[test]
    fn test_direction_none_disables_everything() {
        let mut config = layout(Direction::None);
        config.gap = Some(8.0);
        config.wrap = Some(true);
        let resolved = resolve_layout(&config);
        assert_eq!(resolved.mode, LayoutMode::None);
        assert_eq!(resolved.item_spacing, None);
        assert!(!resolved.wrap);
        assert!(!resolved.child_context().is_auto_layout());
    }

    #[test]
    fn test_padding_expansion() {
        let mut config = layout(Direction::Vertical);
        config.padding = Some(Spacing::Uniform(16.0));
        assert_eq!(
            resolve_layout(&config).padding,
            Some(Padding::from([16.0; 4]))
        );

        config.padding = Some(Spacing::Sides([1.0, 2.0, 3.0, 4.0]));
        let padding = resolve_layout(&config).padding.expect("padding");
        assert_eq!(padding.top, 1.0);
        assert_eq!(padding.right, 2.0);
        assert_eq!(padding.bottom, 3.0);
        assert_eq!(padding.left, 4.0);
    }

    #[test]
    fn test_alignment_mapping() {
        let mut config = layout(Direction::Horizontal);
        config.align = Some(MainAlign::SpaceBetween);
        config.cross_align = Some(CrossAlign::End);
        let resolved = resolve_layout(&config);
        assert_eq!(resolved.primary_align, PrimaryAxisAlign::SpaceBetween);
        assert_eq!(resolved.counter_align, CounterAxisAlign::Max);
        assert!(!resolved.stretch_children);

        let resolved = resolve_layout(&layout(Direction::Vertical));
        assert_eq!(resolved.primary_align, PrimaryAxisAlign::Min);
        assert_eq!(resolved.counter_align, CounterAxisAlign::Min);
    }

    #[test]
    fn test_stretch_maps_to_start_plus_flag() {
        let mut config = layout(Direction::Vertical);
        config.cross_align = Some(CrossAlign::Stretch);
        let resolved = resolve_layout(&config);
        assert_eq!(resolved.counter_align, CounterAxisAlign::Min);
        assert!(resolved.stretch_children);
    }

    #[test]
    fn test_wrap_only_horizontal() {
        let mut config = layout(Direction::Vertical);
        config.wrap = Some(true);
        assert!(!resolve_layout(&config).wrap);

        config.direction = Direction::Horizontal;
        assert!(resolve_layout(&config).wrap);
    }

    #[test]
    fn test_stretch_parent_fills_cross_axis_of_unsized_child() {
        let column = ParentContext {
            mode: LayoutMode::Vertical,
            stretch: true,
        };
        let resolved = resolve_sizing(None, column, SHAPE);
        assert_eq!(resolved.horizontal, Some(AxisSizing::Fill));
        assert_eq!(resolved.vertical, None);

        let row = ParentContext {
            mode: LayoutMode::Horizontal,
            stretch: true,
        };
        let resolved = resolve_sizing(None, row, SHAPE);
        assert_eq!(resolved.horizontal, None);
        assert_eq!(resolved.vertical, Some(AxisSizing::Fill));
    }

    #[test]
    fn test_explicit_sizing_wins_over_stretch() {
        let column = ParentContext {
            mode: LayoutMode::Vertical,
            stretch: true,
        };
        let sizing = SizingConfig::hug();
        let resolved = resolve_sizing(Some(&sizing), column, TEXT);
        assert_eq!(resolved.horizontal, Some(AxisSizing::Hug));
        assert_eq!(resolved.vertical, Some(AxisSizing::Hug));
    }

    #[test]
    fn test_no_sizing_without_stretch_is_noop() {
        let row = ParentContext {
            mode: LayoutMode::Horizontal,
            stretch: false,
        };
        assert_eq!(resolve_sizing(None, row, TEXT), ResolvedSizing::default());
    }

    #[test]
    fn test_fill_outside_auto_layout_is_skipped() {
        let sizing = SizingConfig {
            width: SizingMode::Fill,
            height: SizingMode::Fixed,
            ..SizingConfig::hug()
        };
        let resolved = resolve_sizing(Some(&sizing), ParentContext::PAGE, SHAPE);
        assert_eq!(resolved.horizontal, None);
        assert_eq!(resolved.vertical, Some(AxisSizing::Fixed));
        assert_eq!(
            resolved.skipped,
            vec![SkippedSizing {
                axis: Axis::Horizontal,
                mode: SizingMode::Fill,
                reason: SkipReason::FillOutsideAutoLayout,
            }]
        );
    }

    #[test]
    fn test_hug_requires_content() {
        let column = ParentContext {
            mode: LayoutMode::Vertical,
            stretch: false,
        };
        let resolved = resolve_sizing(Some(&SizingConfig::hug()), column, SHAPE);
        assert_eq!(resolved.horizontal, None);
        assert_eq!(resolved.skipped.len(), 2);
        assert_eq!(resolved.skipped[0].reason, SkipReason::HugWithoutContent);
    }

    #[test]
    fn test_bounds_collected() {
        let sizing = SizingConfig {
            min_width: Some(100.0),
            ..SizingConfig::hug()
        };
        let resolved = resolve_sizing(Some(&sizing), ParentContext::PAGE, TEXT);
        let bounds = resolved.bounds.expect("bounds");
        assert_eq!(bounds.min_width, Some(100.0));
        assert!(bounds.max_width.is_none());

        let resolved = resolve_sizing(Some(&SizingConfig::hug()), ParentContext::PAGE, TEXT);
        assert!(resolved.bounds.is_none());
    }
}
