//! # Prompt Design
//!
//! `serve` runs the HTTP API; `render` verifies a design file and prints the
//! scene it renders to.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use design_renderer::{FontCache, MemoryHost, RenderConfig};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use design_server::config::{Cli, Command, RenderArgs, ServeArgs};
use design_server::{router, AppState, GeminiClient};

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,design_server=debug,tower_http=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,design_server=debug,tower_http=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    match Cli::parse().command {
        Command::Serve(args) => serve(args).await,
        Command::Render(args) => render_file(args).await,
    }
}

async fn serve(args: ServeArgs) -> anyhow::Result<()> {
    let client = GeminiClient::new(args.gemini.config())
        .context("Failed to configure the Gemini client")?;
    tracing::info!(endpoint = %client.endpoint(), "Gemini client configured");

    let app = router(AppState::new(Arc::new(client)));

    let addr = args.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Prompt design server starting on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn render_file(args: RenderArgs) -> anyhow::Result<()> {
    let raw = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let verified = design_core::process(&raw).context("Design is not valid")?;
    for warning in &verified.warnings {
        tracing::warn!("{}", warning);
    }

    let mut host = MemoryHost::new();
    let mut fonts = FontCache::new();
    let outcome = design_renderer::render(
        &mut host,
        &mut fonts,
        &RenderConfig::default(),
        &verified.document,
    )
    .await
    .context("Render failed")?;

    let report = json!({
        "name": verified.document.meta.name,
        "nodes": outcome.nodes,
        "warnings": outcome.warnings.iter().map(ToString::to_string).collect::<Vec<_>>(),
        "scene": host.snapshot(),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
