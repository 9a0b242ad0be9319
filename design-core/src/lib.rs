//! # Design Core
//!
//! Document model and verification pipeline for generated UI designs.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                design-core                  │
//! ├─────────────────────────────────────────────┤
//! │  Pipeline         │  Document model         │
//! │  - Fence strip    │  - Node tree            │
//! │  - JSON decode    │  - Layout / sizing      │
//! │  - Sanitize       │  - Style / typography   │
//! │  - Validate       │  - Tokens               │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Generator text enters through [`pipeline::process`] and leaves as a typed
//! [`Document`] that the renderer can trust.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod defaults;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod sanitize;
pub mod validate;

pub use color::{Color, Rgba, FALLBACK_COLOR};
pub use document::{
    Canvas, ComponentNode, CrossAlign, Direction, Document, Fill, FontFamily, FontWeight,
    FrameNode, GradientStop, ImageContent, ImageNode, LayoutConfig, MainAlign, Meta, Node,
    NodeProps, NodeStyle, NodeType, RectangleNode, ScaleMode, Shadow, ShadowKind, SizingConfig,
    SizingMode, Spacing, Stroke, StrokePosition, TextAlign, TextContent, TextNode, Tokens,
    Typography, WireEnum, SCHEMA_VERSION,
};
pub use error::{DesignError, DesignResult};
pub use pipeline::{parse_raw, process, process_with, strip_fence, Verified};
pub use sanitize::{sanitize, SanitizeWarning, Sanitized, Sanitizer};
pub use validate::{validate, SchemaViolation, ViolationCode};

/// Design core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
