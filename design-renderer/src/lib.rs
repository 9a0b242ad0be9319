//! # Design Renderer
//!
//! Turns a verified design document into native scene-graph nodes.
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                RenderEngine                 │
//! ├──────────────┬──────────────┬───────────────┤
//! │ Layout       │ Sizing       │ FontCache     │
//! │ resolver     │ resolver     │ (memoized)    │
//! ├──────────────┴──────────────┴───────────────┤
//! │             SceneHost trait                 │
//! ├──────────────────────┬──────────────────────┤
//! │ Editor host          │ MemoryHost           │
//! │ (plugin side)        │ (tests, CLI)         │
//! └──────────────────────┴──────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod engine;
pub mod error;
pub mod fonts;
pub mod host;
pub mod layout;
pub mod memory;

pub use config::RenderConfig;
pub use engine::{gradient_transform, render, RenderEngine, RenderOutcome, RenderWarning};
pub use error::{RenderError, RenderResult};
pub use fonts::{font_name, AcquiredFont, FontCache, FontCacheStats};
pub use host::{
    Axis, AxisSizing, CornerRadii, CounterAxisAlign, Effect, EffectKind, FontName, HostError,
    HostNodeId, HostNodeKind, HostResult, ImageHandle, ImageScaleMode, LayoutMode, Padding, Paint,
    PaintStop, PrimaryAxisAlign, SceneHost, SizeBounds, StrokeAlign, TextAlignHorizontal,
};
pub use layout::{
    apply_layout, apply_sizing, resolve_layout, resolve_sizing, NodeCapabilities, ParentContext,
    ResolvedLayout, ResolvedSizing, SkipReason, SkippedSizing,
};
pub use memory::{Attachment, HostOp, MemoryHost, MemoryNode, SceneTree};
