//! Pipeline Integration Tests
//!
//! Runs raw generator output through the full pipeline:
//! - Fence stripping and decoding
//! - Default injection and color repair
//! - Validation and error reporting

use design_core::{
    process, process_with, validate, DesignError, Direction, Fill, Node, Sanitizer, SizingMode,
    ViolationCode,
};
use serde_json::json;

/// Sanitizer with a fixed clock so documents compare equal.
fn fixed() -> Sanitizer {
    Sanitizer::with_timestamp("2024-06-01T12:00:00.000Z")
}

/// A realistic generator response: pricing card wrapped in a Markdown fence.
const FENCED_CARD: &str = r##"```json
{
  "schemaVersion": "1.0",
  "meta": { "name": "Pricing Card", "generatedAt": "2024-06-01T12:00:00Z" },
  "canvas": { "width": 1440, "height": 900 },
  "root": {
    "type": "frame",
    "name": "Card",
    "width": 360,
    "height": 480,
    "layout": { "direction": "vertical", "gap": 16, "padding": 24, "crossAlign": "stretch" },
    "style": {
      "fill": { "type": "solid", "color": "#fff" },
      "cornerRadius": 16,
      "shadow": { "type": "drop", "color": "#0000001a", "offsetX": 0, "offsetY": 8, "blur": 24 }
    },
    "children": [
      { "type": "text", "text": { "content": "Pro", "typography": { "family": "Inter", "weight": "bold", "size": 28 }, "color": "1F2937" } },
      { "type": "text", "text": { "content": "$29 / month" } },
      { "type": "rectangle", "height": 1, "style": { "fill": { "type": "solid", "color": "#E5E7EB" } } },
      {
        "type": "frame",
        "name": "Button",
        "layout": { "direction": "horizontal", "align": "center", "padding": [12, 24, 12, 24] },
        "sizing": { "width": "fill", "height": "hug" },
        "style": { "fill": { "type": "gradient", "gradientStops": [
          { "color": "#3B82F6", "position": 0 }, { "color": "#1D4ED8", "position": 1 }
        ] }, "cornerRadius": 8 },
        "children": [ { "type": "text", "text": { "content": "Subscribe", "color": "#FFFFFF" } } ]
      }
    ]
  }
}
```"##;

// ============================================================================
// Happy Path
// ============================================================================

#[test]
fn test_fenced_output_is_verified() {
    let verified = process_with(&fixed(), FENCED_CARD).expect("should verify");
    let doc = verified.document;

    assert_eq!(doc.meta.name, "Pricing Card");
    assert_eq!(doc.root.count(), 6);

    let Node::Frame(card) = &doc.root else {
        panic!("Expected frame root");
    };
    assert_eq!(
        card.props.layout.as_ref().map(|l| l.direction),
        Some(Direction::Vertical)
    );

    let fill = card
        .props
        .style
        .as_ref()
        .and_then(|s| s.fill.as_ref())
        .expect("card fill");
    match fill {
        Fill::Solid { color } => assert_eq!(color.as_str(), "#FFFFFF"),
        Fill::Gradient { .. } => panic!("Expected solid fill"),
    }
}

#[test]
fn test_text_nodes_get_hug_sizing() {
    let verified = process_with(&fixed(), FENCED_CARD).expect("should verify");

    for child in verified.document.root.children() {
        if let Node::Text(text) = child {
            let sizing = text.props.sizing.expect("text sizing");
            assert_eq!(sizing.width, SizingMode::Hug);
            assert_eq!(sizing.height, SizingMode::Hug);
        }
    }
}

#[test]
fn test_colors_are_canonical_after_sanitize() {
    let verified = process_with(&fixed(), FENCED_CARD).expect("should verify");
    let Node::Text(title) = &verified.document.root.children()[0] else {
        panic!("Expected text");
    };
    assert_eq!(
        title.text.color.as_ref().map(|c| c.as_str()),
        Some("#1F2937")
    );
    assert!(verified.warnings.is_empty());
}

// ============================================================================
// Repairs
// ============================================================================

#[test]
fn test_missing_schema_version_is_repaired() {
    let raw = json!({
        "meta": { "name": "X", "generatedAt": "now" },
        "canvas": { "width": 100, "height": 100 },
        "root": { "type": "frame" }
    })
    .to_string();

    let verified = process(&raw).expect("should verify");
    assert_eq!(verified.document.schema_version, "1.0");
}

#[test]
fn test_bare_root_gets_all_defaults() {
    let verified =
        process_with(&fixed(), r#"{"root":{"type":"rectangle"}}"#).expect("should verify");
    let doc = verified.document;

    assert_eq!(doc.meta.name, "Generated Design");
    assert_eq!(doc.meta.generated_at, "2024-06-01T12:00:00.000Z");
    assert_eq!(doc.canvas.width, 1440.0);
    assert_eq!(doc.canvas.height, 900.0);
}

#[test]
fn test_unrepairable_color_warns_and_verifies() {
    let raw = json!({
        "root": { "type": "rectangle", "style": { "fill": { "type": "solid", "color": "cornflowerblue" } } }
    })
    .to_string();

    let verified = process_with(&fixed(), &raw).expect("should verify");
    assert_eq!(verified.warnings.len(), 1);
    assert_eq!(verified.warnings[0].path, "root.style.fill.color");
}

// ============================================================================
// Rejections
// ============================================================================

#[test]
fn test_future_schema_version_rejected() {
    let raw = json!({ "schemaVersion": "2.0", "root": { "type": "frame" } }).to_string();
    let err = process(&raw).expect_err("should reject");

    assert_eq!(err.violations().len(), 1);
    assert_eq!(err.violations()[0].code, ViolationCode::InvalidLiteral);
}

#[test]
fn test_single_stop_gradient_rejected() {
    let raw = json!({
        "root": { "type": "rectangle", "style": { "fill": {
            "type": "gradient", "gradientStops": [ { "color": "#000000", "position": 0 } ]
        } } }
    })
    .to_string();

    let err = process(&raw).expect_err("should reject");
    assert_eq!(err.violations()[0].code, ViolationCode::TooFewItems);
}

#[test]
fn test_prose_is_a_parse_error() {
    let err = process("Sure! Here is a login form design.").expect_err("should reject");
    assert!(matches!(err, DesignError::Parse(_)));
    assert!(err.messages()[0].starts_with("Invalid JSON format"));
}

#[test]
fn test_messages_are_path_qualified() {
    let raw = json!({
        "root": { "type": "frame", "children": [
            { "type": "text", "text": { "content": "x", "typography": { "family": "Comic Sans", "weight": "bold", "size": 12 } } }
        ] }
    })
    .to_string();

    let err = process(&raw).expect_err("should reject");
    let messages = err.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with("root.children.0.text.typography.family: "));
}

// ============================================================================
// Round Trip
// ============================================================================

#[test]
fn test_verified_document_revalidates_unchanged() {
    let verified = process_with(&fixed(), FENCED_CARD).expect("should verify");
    let value = serde_json::to_value(&verified.document).expect("should serialize");
    let again = validate(&value).expect("should revalidate");
    assert_eq!(again, verified.document);
}
