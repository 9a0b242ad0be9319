//! Render Integration Tests
//!
//! Renders verified documents into the in-memory host:
//! - Call ordering (attach before sizing, font before content)
//! - Stretch containers and sizing fallbacks
//! - Font and image degradation
//! - Final placement, selection and viewport
//! - Cleanup of partial trees on failure

use design_core::{process, Document, FontFamily, FontWeight};
use design_renderer::{
    font_name, render, Axis, AxisSizing, EffectKind, FontCache, FontName, HostNodeId,
    HostNodeKind, HostOp, LayoutMode, MemoryHost, Paint, RenderConfig, RenderError,
    RenderWarning, SizeBounds,
};
use serde_json::{json, Value};

/// Run a JSON value through the core pipeline.
fn document(value: &Value) -> Document {
    process(&value.to_string())
        .expect("fixture should verify")
        .document
}

/// Wrap a root node in a minimal document.
fn with_root(root: Value) -> Document {
    document(&json!({ "schemaVersion": "1.0", "root": root }))
}

/// Card with a stretch column, text, a divider and a nested button.
fn card() -> Document {
    with_root(json!({
        "type": "frame",
        "name": "Card",
        "width": 360,
        "height": 480,
        "layout": { "direction": "vertical", "gap": 16, "padding": 24, "crossAlign": "stretch" },
        "style": {
            "fill": { "type": "solid", "color": "#FFFFFF" },
            "cornerRadius": 16,
            "shadow": { "type": "drop", "color": "#000000", "offsetX": 0, "offsetY": 8, "blur": 24 }
        },
        "children": [
            { "type": "text", "name": "Title", "text": { "content": "Pro", "typography": { "family": "Inter", "weight": "bold", "size": 28 } } },
            { "type": "rectangle", "name": "Divider", "height": 1, "style": { "fill": { "type": "solid", "color": "#E5E7EB" } } },
            {
                "type": "frame",
                "name": "Button",
                "layout": { "direction": "horizontal", "align": "center", "padding": [12, 24, 12, 24] },
                "sizing": { "width": "fill", "height": "hug" },
                "style": { "fill": { "type": "gradient", "gradientStops": [
                    { "color": "#3B82F6", "position": 0 }, { "color": "#1D4ED8", "position": 1 }
                ] } },
                "children": [ { "type": "text", "name": "Label", "text": { "content": "Subscribe", "color": "#FFFFFF" } } ]
            }
        ]
    }))
}

/// Find the first node with `name` anywhere in the host.
fn find(host: &MemoryHost, name: &str) -> HostNodeId {
    fn walk(host: &MemoryHost, id: HostNodeId, name: &str) -> Option<HostNodeId> {
        if host.node(id)?.name == name {
            return Some(id);
        }
        host.children(id)
            .iter()
            .find_map(|child| walk(host, *child, name))
    }
    host.page()
        .iter()
        .find_map(|root| walk(host, *root, name))
        .expect("node should exist")
}

fn position(ops: &[HostOp], op: &HostOp) -> usize {
    ops.iter()
        .position(|o| o == op)
        .expect("operation should be recorded")
}

// ============================================================================
// Tree Construction
// ============================================================================

#[tokio::test]
async fn test_card_renders_every_node() {
    let mut host = MemoryHost::new();
    let mut fonts = FontCache::new();
    let outcome = render(&mut host, &mut fonts, &RenderConfig::default(), &card())
        .await
        .expect("render should succeed");

    assert_eq!(outcome.nodes, 5);
    assert_eq!(host.len(), 5);
    assert!(outcome.warnings.is_empty());
    assert_eq!(host.page(), &[outcome.root]);

    let root = host.node(outcome.root).expect("root");
    assert_eq!(root.name, "Card");
    assert_eq!(root.layout_mode, LayoutMode::Vertical);
    assert!((root.width - 360.0).abs() < f64::EPSILON);
    assert_eq!(host.children(outcome.root).len(), 3);
}

#[tokio::test]
async fn test_parents_attach_before_children_exist() {
    let mut host = MemoryHost::new();
    let mut fonts = FontCache::new();
    render(&mut host, &mut fonts, &RenderConfig::default(), &card())
        .await
        .expect("render should succeed");

    let button = find(&host, "Button");
    let label = find(&host, "Label");
    let ops = host.ops();

    let button_attached = position(
        ops,
        &HostOp::Attach {
            node: button,
            parent: host.page().first().copied(),
        },
    );
    let label_created = position(ops, &HostOp::Create(label, HostNodeKind::Text));
    assert!(button_attached < label_created);
}

#[tokio::test]
async fn test_text_font_bound_before_characters() {
    let mut host = MemoryHost::new();
    let mut fonts = FontCache::new();
    render(&mut host, &mut fonts, &RenderConfig::default(), &card())
        .await
        .expect("render should succeed");

    let title = find(&host, "Title");
    let ops = host.ops();
    assert!(position(ops, &HostOp::SetFont(title)) < position(ops, &HostOp::SetCharacters(title)));

    let node = host.node(title).expect("title");
    assert_eq!(
        node.font,
        Some(font_name(FontFamily::Inter, FontWeight::Bold))
    );
    assert_eq!(node.characters.as_deref(), Some("Pro"));
    assert_eq!(node.font_size, Some(28.0));
}

#[tokio::test]
async fn test_sizing_set_after_attachment() {
    let mut host = MemoryHost::new();
    let mut fonts = FontCache::new();
    render(&mut host, &mut fonts, &RenderConfig::default(), &card())
        .await
        .expect("render should succeed");

    let ops = host.ops();
    for (index, op) in ops.iter().enumerate() {
        if let HostOp::SetSizing(node, _, _) = op {
            let attached = ops[..index]
                .iter()
                .any(|o| matches!(o, HostOp::Attach { node: n, .. } if n == node));
            assert!(attached, "sizing of {node} set before attachment");
        }
    }
}

// ============================================================================
// Layout and Sizing
// ============================================================================

#[tokio::test]
async fn test_stretch_fills_cross_axis() {
    let mut host = MemoryHost::new();
    let mut fonts = FontCache::new();
    render(&mut host, &mut fonts, &RenderConfig::default(), &card())
        .await
        .expect("render should succeed");

    let divider = host.node(find(&host, "Divider")).expect("divider");
    assert_eq!(divider.sizing_horizontal, AxisSizing::Fill);
    assert_eq!(divider.sizing_vertical, AxisSizing::Fixed);

    // Explicit sizing wins over stretch.
    let title = host.node(find(&host, "Title")).expect("title");
    assert_eq!(title.sizing_horizontal, AxisSizing::Hug);
}

#[tokio::test]
async fn test_nested_container_hugs_and_fills() {
    let mut host = MemoryHost::new();
    let mut fonts = FontCache::new();
    render(&mut host, &mut fonts, &RenderConfig::default(), &card())
        .await
        .expect("render should succeed");

    let button = host.node(find(&host, "Button")).expect("button");
    assert_eq!(button.sizing_horizontal, AxisSizing::Fill);
    assert_eq!(button.sizing_vertical, AxisSizing::Hug);
    assert_eq!(button.layout_mode, LayoutMode::Horizontal);
    assert!((button.padding.left - 24.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_fill_outside_auto_layout_is_skipped() {
    let doc = with_root(json!({
        "type": "frame",
        "name": "Free",
        "children": [
            { "type": "rectangle", "name": "Box", "sizing": { "width": "fill", "height": "fixed" } }
        ]
    }));

    let mut host = MemoryHost::new();
    let mut fonts = FontCache::new();
    let outcome = render(&mut host, &mut fonts, &RenderConfig::default(), &doc)
        .await
        .expect("skipped sizing is not fatal");

    assert_eq!(outcome.warnings.len(), 1);
    assert!(matches!(
        &outcome.warnings[0],
        RenderWarning::SizingSkipped { node, axis: Axis::Horizontal, .. } if node == "Box"
    ));
    let rect = host.node(find(&host, "Box")).expect("box");
    assert_eq!(rect.sizing_horizontal, AxisSizing::Fixed);
}

#[tokio::test]
async fn test_size_bounds_applied_under_auto_layout() {
    let doc = with_root(json!({
        "type": "frame",
        "layout": { "direction": "vertical" },
        "children": [
            { "type": "rectangle", "name": "Bounded", "sizing": { "width": "fill", "height": "fixed", "minWidth": 120, "maxWidth": 480 } }
        ]
    }));

    let mut host = MemoryHost::new();
    let mut fonts = FontCache::new();
    render(&mut host, &mut fonts, &RenderConfig::default(), &doc)
        .await
        .expect("render should succeed");

    let rect = host.node(find(&host, "Bounded")).expect("bounded");
    assert_eq!(
        rect.bounds,
        SizeBounds {
            min_width: Some(120.0),
            max_width: Some(480.0),
            min_height: None,
            max_height: None,
        }
    );
}

// ============================================================================
// Styling
// ============================================================================

#[tokio::test]
async fn test_container_style_paints() {
    let mut host = MemoryHost::new();
    let mut fonts = FontCache::new();
    let outcome = render(&mut host, &mut fonts, &RenderConfig::default(), &card())
        .await
        .expect("render should succeed");

    let root = host.node(outcome.root).expect("root");
    assert_eq!(root.effects.len(), 1);
    assert_eq!(root.effects[0].kind, EffectKind::DropShadow);
    assert!((root.effects[0].color.a - 0.25).abs() < f32::EPSILON);

    let button = host.node(find(&host, "Button")).expect("button");
    assert!(matches!(
        button.fills.as_slice(),
        [Paint::GradientLinear { stops, .. }] if stops.len() == 2
    ));
}

#[tokio::test]
async fn test_unstyled_container_has_no_fill() {
    let doc = with_root(json!({ "type": "frame", "name": "Bare" }));
    let mut host = MemoryHost::new();
    let mut fonts = FontCache::new();
    let outcome = render(&mut host, &mut fonts, &RenderConfig::default(), &doc)
        .await
        .expect("render should succeed");

    assert!(host.node(outcome.root).expect("root").fills.is_empty());
}

// ============================================================================
// Degradation
// ============================================================================

#[tokio::test]
async fn test_missing_font_falls_back_to_default() {
    let doc = with_root(json!({
        "type": "frame",
        "children": [
            { "type": "text", "name": "Heading", "text": { "content": "Hello", "typography": { "family": "Roboto", "weight": "bold", "size": 24 } } }
        ]
    }));

    let mut host =
        MemoryHost::new().with_available_fonts([font_name(FontFamily::Inter, FontWeight::Regular)]);
    let mut fonts = FontCache::new();
    let outcome = render(&mut host, &mut fonts, &RenderConfig::default(), &doc)
        .await
        .expect("fallback is not fatal");

    assert_eq!(
        outcome.warnings,
        vec![RenderWarning::FontFallback {
            node: "Heading".to_string(),
            requested: font_name(FontFamily::Roboto, FontWeight::Bold),
            used: font_name(FontFamily::Inter, FontWeight::Regular),
        }]
    );
    let heading = host.node(find(&host, "Heading")).expect("heading");
    assert_eq!(heading.characters.as_deref(), Some("Hello"));
}

#[tokio::test]
async fn test_failed_image_uses_placeholder() {
    let doc = with_root(json!({
        "type": "frame",
        "children": [
            { "type": "image", "name": "Hero", "width": 320, "height": 180, "image": { "url": "https://cdn.example/hero.png" }, "style": { "cornerRadius": 12 } },
            { "type": "image", "name": "Avatar", "image": { "url": "https://cdn.example/avatar.png", "scaleMode": "fit" } },
            { "type": "image", "name": "Mock", "image": { "placeholder": true } }
        ]
    }));

    let mut host = MemoryHost::new().with_failing_image("https://cdn.example/hero.png");
    let mut fonts = FontCache::new();
    let config = RenderConfig::default();
    let outcome = render(&mut host, &mut fonts, &config, &doc)
        .await
        .expect("image failure is not fatal");

    let placeholder = Paint::Solid {
        color: config.placeholder_color.to_rgba(),
    };

    let hero = host.node(find(&host, "Hero")).expect("hero");
    assert_eq!(hero.fills, vec![placeholder.clone()]);
    assert!((hero.corner_radii.top_left - 12.0).abs() < f64::EPSILON);
    assert!(matches!(
        outcome.warnings.as_slice(),
        [RenderWarning::ImageFallback { node, .. }] if node == "Hero"
    ));

    let avatar = host.node(find(&host, "Avatar")).expect("avatar");
    assert!(matches!(avatar.fills.as_slice(), [Paint::Image { .. }]));

    let mock = host.node(find(&host, "Mock")).expect("mock");
    assert_eq!(mock.fills, vec![placeholder]);
    assert!(!host
        .ops()
        .iter()
        .any(|op| matches!(op, HostOp::FetchImage(url) if url.contains("mock"))));
}

// ============================================================================
// Finalization and Failure
// ============================================================================

#[tokio::test]
async fn test_root_placed_selected_and_focused() {
    let mut host = MemoryHost::new();
    let mut fonts = FontCache::new();
    let outcome = render(&mut host, &mut fonts, &RenderConfig::default(), &card())
        .await
        .expect("render should succeed");

    let root = host.node(outcome.root).expect("root");
    assert!(root.x.abs() < f64::EPSILON);
    assert!(root.y.abs() < f64::EPSILON);
    assert_eq!(host.selection(), &[outcome.root]);
    assert_eq!(host.viewport_focus(), &[outcome.root]);
}

#[tokio::test]
async fn test_unavailable_default_font_removes_partial_tree() {
    let mut host = MemoryHost::new().with_available_fonts(Vec::<FontName>::new());
    let mut fonts = FontCache::new();
    let err = render(&mut host, &mut fonts, &RenderConfig::default(), &card())
        .await
        .expect_err("no fonts at all is fatal");

    assert!(matches!(err, RenderError::DefaultFontUnavailable { .. }));
    assert!(host.is_empty());
    assert!(host.page().is_empty());
    assert!(host.selection().is_empty());
}

#[tokio::test]
async fn test_font_failure_removes_unattached_text() {
    let mut host = MemoryHost::new().with_available_fonts(Vec::<FontName>::new());
    let mut fonts = FontCache::new();
    render(&mut host, &mut fonts, &RenderConfig::default(), &card())
        .await
        .expect_err("no fonts at all is fatal");

    let text = host
        .ops()
        .iter()
        .find_map(|op| match op {
            HostOp::Create(id, HostNodeKind::Text) => Some(*id),
            _ => None,
        })
        .expect("title was created");
    assert!(!host
        .ops()
        .iter()
        .any(|op| matches!(op, HostOp::Attach { node, .. } if *node == text)));
    assert!(host.ops().contains(&HostOp::Remove(text)));
    assert!(host.node(text).is_none());
    assert!(host.is_empty());
}

#[tokio::test]
async fn test_font_failure_on_text_root_removes_it_once() {
    let doc = with_root(json!({ "type": "text", "text": { "content": "Hello" } }));
    let mut host = MemoryHost::new().with_available_fonts(Vec::<FontName>::new());
    let mut fonts = FontCache::new();
    render(&mut host, &mut fonts, &RenderConfig::default(), &doc)
        .await
        .expect_err("no fonts at all is fatal");

    let removals = host
        .ops()
        .iter()
        .filter(|op| matches!(op, HostOp::Remove(_)))
        .count();
    assert_eq!(removals, 1);
    assert!(host.is_empty());
}

#[tokio::test]
async fn test_font_loads_are_memoized_across_renders() {
    let mut host = MemoryHost::new();
    let mut fonts = FontCache::new();
    let config = RenderConfig::default();

    render(&mut host, &mut fonts, &config, &card())
        .await
        .expect("first render");
    render(&mut host, &mut fonts, &config, &card())
        .await
        .expect("second render");

    let bold = font_name(FontFamily::Inter, FontWeight::Bold);
    assert_eq!(host.font_load_count(&bold), 1);
    assert_eq!(host.page().len(), 2);
    assert!(fonts.stats().hits >= 2);
}
