//! Text-generation client.
//!
//! [`TextGenerator`] is the capability the orchestrator consumes;
//! [`GeminiClient`] implements it over the Gemini `generateContent` REST
//! endpoint with the design system prompt as system instruction and JSON
//! output requested.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::prompt::SYSTEM_PROMPT;

/// Default Gemini model.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
/// Default Gemini REST base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Errors raised while calling the generation model.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The configured base URL is invalid.
    #[error("invalid Gemini API URL: {0}")]
    InvalidUrl(String),

    /// Transport failure (connection, timeout, body decoding).
    #[error("Gemini request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("Gemini API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message reported by the API.
        message: String,
    },

    /// The response carried no text.
    #[error("Empty response from LLM")]
    EmptyResponse,
}

/// Something that turns a prompt into raw design JSON text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate raw design text for `prompt`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] on transport, quota or empty-output
    /// failures.
    async fn generate_design(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Whether the generator is configured to serve requests.
    fn is_ready(&self) -> bool {
        true
    }
}

/// Gemini client settings.
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`.
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// REST base URL.
    pub api_base: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Output token ceiling.
    pub max_output_tokens: u32,
    /// Request timeout.
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            temperature: 0.7,
            max_output_tokens: 16_384,
            timeout: Duration::from_secs(60),
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// [`TextGenerator`] backed by the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    endpoint: Url,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a client.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidUrl`] if the base URL or model name
    /// do not form a valid endpoint, and [`GenerationError::Http`] if the
    /// HTTP client fails to build.
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        let mut base =
            Url::parse(&config.api_base).map_err(|e| GenerationError::InvalidUrl(e.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let endpoint = base
            .join(&format!("v1beta/models/{}:generateContent", config.model))
            .map_err(|e| GenerationError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .user_agent(concat!("prompt-design/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint,
            config,
        })
    }

    /// The resolved `generateContent` endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn request<'a>(&'a self, prompt: &'a str) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: SYSTEM_PROMPT,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            },
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_design(&self, prompt: &str) -> Result<String, GenerationError> {
        tracing::info!(
            model = %self.config.model,
            "Generating design for prompt: \"{}...\"",
            preview(prompt)
        );

        let response = self
            .http
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&self.request(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(GenerationError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        tracing::info!("Generated {} characters", text.len());
        Ok(text)
    }

    fn is_ready(&self) -> bool {
        !self.config.api_key.is_empty()
    }
}

/// First 50 characters, for logs.
pub(crate) fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
