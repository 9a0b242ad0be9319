//! Command-line and environment configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use crate::llm::{GeminiConfig, DEFAULT_API_BASE, DEFAULT_MODEL};

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Prompt-to-design service.
#[derive(Debug, Parser)]
#[command(name = "prompt-design", version, about)]
pub struct Cli {
    /// What to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the HTTP API.
    Serve(ServeArgs),
    /// Verify a design file and render it into an in-memory scene.
    Render(RenderArgs),
}

/// Options for `serve`.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Port to listen on.
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Generation model settings.
    #[command(flatten)]
    pub gemini: GeminiArgs,
}

impl ServeArgs {
    /// Socket address to bind.
    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Gemini settings.
#[derive(Debug, Args)]
pub struct GeminiArgs {
    /// Google AI API key.
    #[arg(long, env = "GOOGLE_AI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Model name.
    #[arg(long, env = "GOOGLE_AI_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Sampling temperature.
    #[arg(long, default_value_t = 0.7)]
    pub temperature: f32,

    /// Output token ceiling.
    #[arg(long, default_value_t = 16_384)]
    pub max_output_tokens: u32,

    /// Request timeout in seconds.
    #[arg(long, default_value_t = 60)]
    pub timeout_secs: u64,

    /// REST base URL.
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,
}

impl GeminiArgs {
    /// Client configuration.
    #[must_use]
    pub fn config(&self) -> GeminiConfig {
        GeminiConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            api_base: self.api_base.clone(),
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Options for `render`.
#[derive(Debug, Args)]
pub struct RenderArgs {
    /// Design JSON file (a Markdown fence around it is accepted).
    pub file: PathBuf,
}
