//! Generation orchestrator.
//!
//! One model call, the full parse → sanitize → validate pipeline, and at most
//! one corrective call carrying the errors of the first attempt:
//!
//! ```text
//! prompt ──▶ generate ──▶ process ──ok──▶ Document
//!                            │
//!                          errors
//!                            ▼
//!            correction_prompt ──▶ generate ──▶ process ──ok──▶ Document
//!                                                  │
//!                                                errors ──▶ GenerationFailed
//! ```
//!
//! Undecodable output counts as a validation failure. Transport failures are
//! not retried.

use std::sync::Arc;

use design_core::{process_with, Document, Sanitizer, Verified};
use thiserror::Error;

use crate::llm::{preview, GenerationError, TextGenerator};
use crate::prompt::correction_prompt;

/// Result type for the orchestrator.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Terminal orchestrator failures.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The prompt is empty or whitespace-only.
    #[error("Prompt is required")]
    EmptyPrompt,

    /// Both attempts produced invalid documents.
    #[error("Failed to generate valid design")]
    GenerationFailed {
        /// Path-qualified errors of the last attempt.
        errors: Vec<String>,
    },

    /// The model could not be called.
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Turns prompts into verified documents.
pub struct DesignGenerator {
    llm: Arc<dyn TextGenerator>,
    sanitizer: Sanitizer,
}

impl DesignGenerator {
    /// Create an orchestrator over a text generator.
    #[must_use]
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self::with_sanitizer(llm, Sanitizer::new())
    }

    /// Create an orchestrator with a custom sanitizer.
    #[must_use]
    pub fn with_sanitizer(llm: Arc<dyn TextGenerator>, sanitizer: Sanitizer) -> Self {
        Self { llm, sanitizer }
    }

    /// Whether the underlying generator can serve requests.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.llm.is_ready()
    }

    /// Generate a verified document for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::EmptyPrompt`] for blank prompts,
    /// [`GenerateError::Generation`] when the model call fails, and
    /// [`GenerateError::GenerationFailed`] when the corrective attempt is
    /// invalid too.
    pub async fn generate(&self, prompt: &str) -> GenerateResult<Document> {
        if prompt.trim().is_empty() {
            return Err(GenerateError::EmptyPrompt);
        }

        tracing::info!("Processing prompt: \"{}...\"", preview(prompt));

        let errors = match self.attempt(prompt).await? {
            Ok(verified) => return Ok(self.accept(verified)),
            Err(errors) => errors,
        };

        tracing::warn!("First attempt failed: {}", errors.join(", "));
        tracing::info!("Retrying with correction prompt");

        match self.attempt(&correction_prompt(&errors, prompt)).await? {
            Ok(verified) => Ok(self.accept(verified)),
            Err(errors) => {
                tracing::error!("Generation failed after retry: {}", errors.join(", "));
                Err(GenerateError::GenerationFailed { errors })
            }
        }
    }

    async fn attempt(&self, prompt: &str) -> GenerateResult<Result<Verified, Vec<String>>> {
        let raw = self.llm.generate_design(prompt).await?;
        Ok(process_with(&self.sanitizer, &raw).map_err(|e| e.messages()))
    }

    #[allow(clippy::unused_self)]
    fn accept(&self, verified: Verified) -> Document {
        for warning in &verified.warnings {
            tracing::warn!("{}", warning);
        }
        tracing::info!(
            "Successfully generated design: {}",
            verified.document.meta.name
        );
        verified.document
    }
}
