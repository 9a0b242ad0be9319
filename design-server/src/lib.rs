//! # Design Server Library
//!
//! HTTP surface and generation orchestrator for prompt-to-design. Used by
//! the binary and by integration tests.
//!
//! ```text
//! ┌────────────────────── design-server ──────────────────────┐
//! │ POST /api/design ──▶ DesignGenerator ──▶ TextGenerator    │
//! │                          │                (Gemini REST)   │
//! │                          ▼                                │
//! │            design-core: parse → sanitize → validate       │
//! └───────────────────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

use std::sync::Arc;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

pub mod config;
pub mod generate;
pub mod health;
pub mod llm;
pub mod prompt;
pub mod routes;
pub mod validation;

pub use generate::{DesignGenerator, GenerateError, GenerateResult};
pub use llm::{GeminiClient, GeminiConfig, GenerationError, TextGenerator};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Generation orchestrator.
    pub generator: Arc<DesignGenerator>,
}

impl AppState {
    /// State around a text generator.
    #[must_use]
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Arc::new(DesignGenerator::new(llm)),
        }
    }
}

/// Build a CORS layer for the plugin UI.
///
/// Plugin iframes send a `null` origin, so any origin is allowed.
fn build_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
}

/// The application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/api/design", post(routes::generate_design))
        // Request ID for tracing correlation
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(build_cors_layer())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
