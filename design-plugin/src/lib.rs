//! # Design Plugin
//!
//! Runtime side of the editor plugin. The UI posts `render` and `cancel`
//! messages; the session validates the payload, renders it into the host and
//! posts back `render-success` or `render-error`.
//!
//! ```text
//! ┌──────────────┐  render / cancel   ┌──────────────────────────┐
//! │  Plugin UI   │ ─────────────────▶ │      PluginSession       │
//! │              │ ◀───────────────── │  validate → RenderEngine │
//! └──────────────┘  render-success /  └────────────┬─────────────┘
//!                   render-error                   │ SceneHost
//!                                                  ▼
//!                                         ┌─────────────────┐
//!                                         │  Editor canvas  │
//!                                         └─────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod message;
pub mod session;

pub use error::{PluginError, PluginResult};
pub use message::{PluginMessage, PluginResponse};
pub use session::PluginSession;
