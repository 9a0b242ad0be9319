//! Generation Orchestrator Integration Tests
//!
//! End-to-end scenarios against a scripted model:
//! - Texts get hug sizing even when the model omits it
//! - Fenced output is accepted
//! - An invalid first attempt triggers exactly one corrective request
//! - Two invalid attempts fail with path-qualified errors

mod common;

use common::{Reply, ScriptedGenerator, ARIAL_HEADING, CARD_WITHOUT_SIZING};
use design_core::{Direction, Node, SizingMode};
use design_server::{DesignGenerator, GenerateError};

// ============================================================================
// Scenario 1: card with title and description
// ============================================================================

#[tokio::test]
async fn test_card_texts_hug_after_sanitizing() {
    let llm = ScriptedGenerator::texts([CARD_WITHOUT_SIZING]);
    let generator = DesignGenerator::new(llm.clone());

    let doc = generator
        .generate("a card with title and description")
        .await
        .expect("valid on first attempt");

    let Node::Frame(card) = &doc.root else {
        panic!("root should be a frame");
    };
    assert_eq!(
        card.props.layout.as_ref().map(|l| l.direction),
        Some(Direction::Vertical)
    );
    assert_eq!(card.children.len(), 2);
    for child in &card.children {
        let Node::Text(text) = child else {
            panic!("children should be text");
        };
        let sizing = text.props.sizing.as_ref().expect("sizing injected");
        assert_eq!(sizing.width, SizingMode::Hug);
        assert_eq!(sizing.height, SizingMode::Hug);
    }
    assert_eq!(llm.prompts().len(), 1);
}

#[tokio::test]
async fn test_colors_are_canonical() {
    let llm = ScriptedGenerator::texts([CARD_WITHOUT_SIZING]);
    let doc = DesignGenerator::new(llm)
        .generate("card")
        .await
        .expect("valid");

    let Node::Frame(card) = &doc.root else {
        panic!("root should be a frame");
    };
    let Node::Text(title) = &card.children[0] else {
        panic!("title should be text");
    };
    assert_eq!(
        title.text.color.as_ref().map(design_core::Color::as_str),
        Some("#1F2937")
    );
}

// ============================================================================
// Scenario 2: fenced output
// ============================================================================

#[tokio::test]
async fn test_fenced_output_parses_first_time() {
    let fenced = format!("```json\n{CARD_WITHOUT_SIZING}\n```");
    let llm = ScriptedGenerator::texts([fenced]);
    let generator = DesignGenerator::new(llm.clone());

    let doc = generator.generate("card").await.expect("fence stripped");
    assert_eq!(doc.meta.name, "Card");
    assert_eq!(llm.prompts().len(), 1);
}

// ============================================================================
// Scenario 3: invalid font family
// ============================================================================

#[tokio::test]
async fn test_invalid_family_retried_once_then_fails() {
    let llm = ScriptedGenerator::texts([ARIAL_HEADING, ARIAL_HEADING, CARD_WITHOUT_SIZING]);
    let generator = DesignGenerator::new(llm.clone());

    let err = generator
        .generate("a welcome heading")
        .await
        .expect_err("both attempts invalid");

    let GenerateError::GenerationFailed { errors } = err else {
        panic!("expected GenerationFailed");
    };
    assert!(errors
        .iter()
        .any(|e| e.starts_with("root.children.0.text.typography.family: ")
            && e.contains("Arial")));

    let prompts = llm.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts[1].contains("typography.family"));
    assert!(prompts[1].contains("\"a welcome heading\""));
}

#[tokio::test]
async fn test_invalid_family_fixed_on_retry() {
    let llm = ScriptedGenerator::texts([ARIAL_HEADING, CARD_WITHOUT_SIZING]);
    let doc = DesignGenerator::new(llm.clone())
        .generate("a card")
        .await
        .expect("second attempt valid");

    assert_eq!(doc.meta.name, "Card");
    assert_eq!(llm.prompts().len(), 2);
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_model_failure_on_retry_surfaces() {
    let llm = ScriptedGenerator::new([Reply::Text(ARIAL_HEADING.to_string()), Reply::Fail]);
    let err = DesignGenerator::new(llm.clone())
        .generate("a heading")
        .await
        .expect_err("retry call fails");

    assert!(matches!(err, GenerateError::Generation(_)));
    assert_eq!(llm.prompts().len(), 2);
}

#[tokio::test]
async fn test_single_stop_gradient_not_repaired() {
    let single_stop = r##"{
      "schemaVersion": "1.0",
      "root": { "type": "rectangle", "style": { "fill": { "type": "gradient", "gradientStops": [ { "color": "#fff", "position": 0 } ] } } }
    }"##;
    let llm = ScriptedGenerator::texts([single_stop, single_stop]);
    let err = DesignGenerator::new(llm)
        .generate("a gradient")
        .await
        .expect_err("gradient needs two stops");

    let GenerateError::GenerationFailed { errors } = err else {
        panic!("expected GenerationFailed");
    };
    assert!(errors
        .iter()
        .any(|e| e.starts_with("root.style.fill.gradientStops: ")));
}
