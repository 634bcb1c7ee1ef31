//! CrisisTrace Ultra - Emergency Dispatch Command Console
//!
//! HTTP backend and embedded dashboard for crisis-line operators.
//!
//! # Usage
//!
//! ```bash
//! # Run with defaults (0.0.0.0:8080, built-in config)
//! cargo run --release
//!
//! # Explicit bind address and config file
//! ./crisistrace --addr 127.0.0.1:9000 --config ./crisistrace.toml
//! ```
//!
//! # Environment Variables
//!
//! - `QDRANT_URL`, `QDRANT_KEY`: Vector index endpoint and API key (required)
//! - `GROQ_KEY`: Chat completion API key (required)
//! - `CRISISTRACE_CONFIG`: Path to a TOML config file
//! - `CRISISTRACE_SERVER_ADDR`: Bind address override
//! - `CRISISTRACE_CORS_ORIGINS`: Comma-separated allowed origins
//! - `CRISISTRACE_LOG_JSON`: Set to "true" for JSON log lines
//! - `RUST_LOG`: Logging level (default: info)
//!
//! A `.env` file in the working directory is read before the environment.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crisistrace::api::{create_app, DashboardState};
use crisistrace::chat::{GroqChat, GroqChatConfig};
use crisistrace::config::{DispatchConfig, Secrets};
use crisistrace::knowledge::{KnowledgeIndex, QdrantIndex};

/// Env var overriding the configured bind address.
const SERVER_ADDR_ENV_VAR: &str = "CRISISTRACE_SERVER_ADDR";

/// Env var switching log output to JSON.
const LOG_JSON_ENV_VAR: &str = "CRISISTRACE_LOG_JSON";

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "crisistrace")]
#[command(about = "CrisisTrace Ultra - Emergency Dispatch Command Console")]
#[command(version)]
struct CliArgs {
    /// Override the server address (default: "0.0.0.0:8080")
    #[arg(short, long, value_name = "HOST:PORT")]
    addr: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
}

// ============================================================================
// Logging
// ============================================================================

fn log_json_enabled() -> bool {
    std::env::var(LOG_JSON_ENV_VAR)
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if log_json_enabled() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }
}

/// Bind address precedence: `--addr`, then env, then config file.
fn resolve_server_addr(cli: Option<String>, config: &DispatchConfig) -> String {
    cli.or_else(|| std::env::var(SERVER_ADDR_ENV_VAR).ok())
        .unwrap_or_else(|| config.server.addr.clone())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be read before RUST_LOG is consulted
    let dotenv_path = dotenvy::dotenv().ok();
    init_tracing();

    let args = CliArgs::parse();

    let config = DispatchConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    let Secrets {
        qdrant_url,
        qdrant_key,
        groq_key,
    } = Secrets::from_env().context("Missing credentials")?;
    let server_addr = resolve_server_addr(args.addr, &config);

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  CrisisTrace Ultra");
    info!("  Emergency Dispatch Command Console");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("");
    if let Some(path) = &dotenv_path {
        info!("✓ Loaded environment from {}", path.display());
    }

    let index = QdrantIndex::new(
        &qdrant_url,
        qdrant_key,
        &config.knowledge.collection,
        Duration::from_secs(config.knowledge.timeout_secs),
    )
    .context("Failed to build Qdrant client")?;
    info!(
        "🔎 Knowledge index: {} (collection '{}')",
        qdrant_url,
        index.collection()
    );

    let chat = GroqChat::new(GroqChatConfig::from(&config.llm), groq_key)
        .context("Failed to build Groq client")?;
    info!("💬 Chat model: {} @ {}", config.llm.model, config.llm.base_url);
    info!("🧠 Strategy delay: {} ms", config.strategy.delay_ms);
    info!("");

    let state = DashboardState::new(
        Arc::new(index),
        Arc::new(chat),
        Duration::from_millis(config.strategy.delay_ms),
    );
    let app = create_app(state);

    info!("🌐 Starting HTTP server on {}...", server_addr);
    let listener = tokio::net::TcpListener::bind(&server_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", server_addr))?;

    info!("✓ HTTP server listening on {}", server_addr);
    info!("");
    info!("🎯 Console available at: http://{}", server_addr);
    info!("");

    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down..."),
            Err(e) => {
                error!("Failed to listen for Ctrl+C: {}", e);
                return;
            }
        }
        shutdown_token.cancel();
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            cancel_token.cancelled().await;
            info!("[HttpServer] Received shutdown signal");
        })
        .await
        .context("HTTP server error")?;

    info!("[HttpServer] Graceful shutdown complete");
    Ok(())
}
