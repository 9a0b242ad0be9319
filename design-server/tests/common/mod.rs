//! Shared test helpers.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use design_server::{GenerationError, TextGenerator};

/// One scripted model reply.
pub enum Reply {
    /// Return this text.
    Text(String),
    /// Fail with an API error.
    Fail,
}

/// A [`TextGenerator`] that replays canned replies and records prompts.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    /// Replies returned in order; once exhausted every call fails.
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        })
    }

    /// Every reply is `text`.
    pub fn texts<I, S>(texts: I) -> Arc<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(texts.into_iter().map(|t| Reply::Text(t.into())))
    }

    /// Prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("lock").clone()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate_design(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().expect("lock").push(prompt.to_string());
        match self.replies.lock().expect("lock").pop_front() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail) | None => Err(GenerationError::Api {
                status: 503,
                message: "The model is overloaded".to_string(),
            }),
        }
    }
}

/// A card with a title and a description, as a model would return it:
/// no sizing on the texts, lowercase shorthand colors.
pub const CARD_WITHOUT_SIZING: &str = r##"{
  "schemaVersion": "1.0",
  "meta": { "name": "Card", "generatedAt": "2024-06-01T12:00:00Z" },
  "canvas": { "width": 1440, "height": 900 },
  "root": {
    "type": "frame",
    "name": "Card",
    "width": 320,
    "layout": { "direction": "vertical", "padding": 24, "gap": 12 },
    "style": { "fill": { "type": "solid", "color": "#fff" }, "cornerRadius": 12 },
    "children": [
      { "type": "text", "name": "Title", "text": { "content": "Card title", "typography": { "family": "Inter", "weight": "bold", "size": 20 }, "color": "#1f2937" } },
      { "type": "text", "name": "Description", "text": { "content": "Some description.", "color": "#6b7280" } }
    ]
  }
}"##;

/// A design using a font family outside the supported set.
pub const ARIAL_HEADING: &str = r##"{
  "schemaVersion": "1.0",
  "meta": { "name": "Heading", "generatedAt": "2024-06-01T12:00:00Z" },
  "canvas": { "width": 1440, "height": 900 },
  "root": {
    "type": "frame",
    "layout": { "direction": "vertical" },
    "children": [
      { "type": "text", "text": { "content": "Welcome", "typography": { "family": "Arial", "weight": "bold", "size": 32 } } }
    ]
  }
}"##;
