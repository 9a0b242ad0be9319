//! API route handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use design_core::Document;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::generate::GenerateError;
use crate::llm::preview;
use crate::validation::{replace_control_chars, validate_prompt, ValidationError};
use crate::AppState;

/// Body of `POST /api/design`.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateDesignRequest {
    /// Natural-language description of the design.
    #[serde(default)]
    pub prompt: Option<String>,
}

/// Error payload returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Summary.
    pub message: String,
    /// Path-qualified details, possibly empty.
    pub errors: Vec<String>,
}

/// An error response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                message: message.into(),
                errors,
            },
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, e.to_string(), Vec::new())
    }
}

impl From<GenerateError> for ApiError {
    fn from(e: GenerateError) -> Self {
        match e {
            GenerateError::EmptyPrompt => {
                Self::new(StatusCode::BAD_REQUEST, e.to_string(), Vec::new())
            }
            GenerateError::GenerationFailed { ref errors } => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                e.to_string(),
                errors.clone(),
            ),
            GenerateError::Generation(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string(), Vec::new())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Generate a design from a prompt.
///
/// The raw body has its control characters replaced before decoding; an
/// undecodable body is treated as one without a prompt.
///
/// # Errors
///
/// 400 for a missing, blank or oversized prompt; 500 with the last
/// attempt's errors when generation fails.
#[tracing::instrument(name = "generate_design", skip(state, body), fields(generation_id = %Uuid::new_v4()))]
pub async fn generate_design(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<Document>, ApiError> {
    let request: GenerateDesignRequest = serde_json::from_str(&replace_control_chars(&body))
        .unwrap_or_else(|e| {
            tracing::debug!("Undecodable request body: {}", e);
            GenerateDesignRequest::default()
        });

    let prompt = validate_prompt(request.prompt.as_deref())?;
    tracing::info!("POST /api/design - prompt: \"{}...\"", preview(&prompt));

    let document = state.generator.generate(&prompt).await?;
    Ok(Json(document))
}
