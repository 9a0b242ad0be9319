//! Plugin Session Integration Tests
//!
//! Drives a session with raw UI messages:
//! - Full render of a generated document
//! - Error replies that leave the canvas untouched
//! - Font reuse across renders
//! - Cancel semantics

use design_core::{FontFamily, FontWeight};
use design_plugin::{PluginResponse, PluginSession};
use design_renderer::{font_name, FontName, HostNodeKind, MemoryHost};
use serde_json::{json, Value};

/// A signup form as the generation service returns it.
fn signup_form() -> Value {
    json!({
        "schemaVersion": "1.0",
        "meta": { "name": "Signup", "generatedAt": "2024-06-01T12:00:00.000Z" },
        "canvas": { "width": 375, "height": 812 },
        "root": {
            "type": "frame",
            "name": "Form",
            "width": 375,
            "height": 812,
            "layout": { "direction": "vertical", "gap": 12, "padding": 24 },
            "children": [
                {
                    "type": "text",
                    "name": "Heading",
                    "text": { "content": "Create account", "typography": { "family": "Inter", "weight": "semibold", "size": 24 } },
                    "sizing": { "width": "hug", "height": "hug" }
                },
                {
                    "type": "component",
                    "name": "Email Field",
                    "layout": { "direction": "horizontal", "padding": [8, 12, 8, 12] },
                    "sizing": { "width": "fill", "height": "hug" },
                    "style": { "stroke": { "color": "#E5E7EB", "weight": 1 }, "cornerRadius": 6 },
                    "children": [
                        { "type": "text", "text": { "content": "you@example.com", "color": "#6B7280" }, "sizing": { "width": "hug", "height": "hug" } }
                    ]
                },
                { "type": "image", "name": "Illustration", "width": 327, "height": 200, "image": { "placeholder": true } }
            ]
        }
    })
}

fn render_message(payload: Value) -> Value {
    json!({ "type": "render", "payload": payload })
}

// ============================================================================
// Rendering
// ============================================================================

#[tokio::test]
async fn test_render_message_builds_scene() {
    let mut session = PluginSession::new(MemoryHost::new());
    let reply = session
        .handle_json(render_message(signup_form()))
        .await
        .expect("render gets a reply");

    assert!(reply.is_success());
    assert_eq!(reply.message(), "Design \"Signup\" created!");

    let host = session.into_host();
    assert_eq!(host.len(), 5);

    let root = host.page()[0];
    let children = host.children(root);
    assert_eq!(children.len(), 3);

    // Components render as frames.
    let field = host.node(children[1]).expect("field");
    assert_eq!(field.kind, HostNodeKind::Frame);
    assert_eq!(field.name, "Email Field");
    assert!((field.stroke_weight - 1.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_fonts_reused_across_renders() {
    let mut session = PluginSession::new(MemoryHost::new());
    for _ in 0..2 {
        let reply = session
            .handle_json(render_message(signup_form()))
            .await
            .expect("reply");
        assert!(reply.is_success());
    }

    let host = session.into_host();
    let semibold = font_name(FontFamily::Inter, FontWeight::Semibold);
    assert_eq!(host.font_load_count(&semibold), 1);
    assert_eq!(host.page().len(), 2);
}

// ============================================================================
// Error Replies
// ============================================================================

#[tokio::test]
async fn test_validation_error_reply_names_path() {
    let mut form = signup_form();
    form["root"]["children"][0]["text"]["typography"]["family"] = json!("Arial");

    let mut session = PluginSession::new(MemoryHost::new());
    let reply = session
        .handle_json(render_message(form))
        .await
        .expect("reply");

    assert!(!reply.is_success());
    assert!(reply
        .message()
        .contains("root.children.0.text.typography.family"));
    assert!(session.host().is_empty());
}

#[tokio::test]
async fn test_unknown_node_kind_reply() {
    let mut form = signup_form();
    form["root"]["children"][2]["type"] = json!("video");

    let mut session = PluginSession::new(MemoryHost::new());
    let reply = session
        .handle_json(render_message(form))
        .await
        .expect("reply");

    assert!(matches!(reply, PluginResponse::RenderError { .. }));
    assert!(reply.message().contains("video"));
    assert!(session.host().is_empty());
}

#[tokio::test]
async fn test_render_failure_leaves_no_partial_tree() {
    let host = MemoryHost::new().with_available_fonts(Vec::<FontName>::new());
    let mut session = PluginSession::new(host);
    let reply = session
        .handle_json(render_message(signup_form()))
        .await
        .expect("reply");

    assert!(!reply.is_success());
    assert!(session.host().is_empty());
}

#[tokio::test]
async fn test_malformed_message_gets_error_reply() {
    let mut session = PluginSession::new(MemoryHost::new());
    let reply = session
        .handle_json(json!("render"))
        .await
        .expect("reply");
    assert!(reply.message().starts_with("Invalid message"));
}

// ============================================================================
// Cancel
// ============================================================================

#[tokio::test]
async fn test_cancel_then_render_is_ignored() {
    let mut session = PluginSession::new(MemoryHost::new());
    assert!(session.handle_json(json!({ "type": "cancel" })).await.is_none());
    assert!(session.is_closed());
    assert!(session
        .handle_json(render_message(signup_form()))
        .await
        .is_none());
    assert!(session.host().is_empty());
}
