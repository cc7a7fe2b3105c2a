//! Lumina CLI — entry point.
//!
//! # Commands
//!
//! - `lumina serve [--host H] [--port P]` — run the HTTP API
//! - `lumina ask [-q QUESTION] [-l LANG]` — ask once, or open a REPL
//! - `lumina status` — show configuration and provider key status
//! - `lumina init` — write a default config file

mod ask;
mod helpers;
mod init;
mod repl;
mod serve;
mod status;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use lumina_core::config::Config;
use lumina_core::utils::expand_home;
use lumina_providers::{Dispatcher, HttpTransport};

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Lumina — multilingual voice assistant backend for college teachers
#[derive(Parser)]
#[command(name = "lumina", version, about, long_about = None)]
struct Cli {
    /// Config file (default: ~/.lumina/config.json)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Ask a question (single-shot or interactive REPL)
    Ask {
        /// Question to ask. Omit for REPL mode.
        #[arg(short, long)]
        question: Option<String>,

        /// Answer language code (en, hi, ta, te)
        #[arg(short, long, default_value = "en")]
        language: String,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration and provider status
    Status,

    /// Write a default configuration file
    Init,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref().map(expand_home);

    match cli.command {
        Commands::Serve { host, port, logs } => {
            init_logging(logs, "info");
            serve::run(config_path, host, port).await
        }
        Commands::Ask {
            question,
            language,
            logs,
        } => {
            init_logging(logs, "warn");
            ask::run(config_path, question, &language, logs).await
        }
        Commands::Status => status::run(config_path),
        Commands::Init => init::run(config_path),
    }
}

/// Build a `Dispatcher` from the loaded configuration.
pub fn build_dispatcher(config: &Config) -> Result<Dispatcher> {
    let timeout = Duration::from_secs(config.dispatch.timeout_secs.max(1));
    let transport = HttpTransport::new(timeout).context("failed to build HTTP client")?;

    Dispatcher::new(config.providers.clone(), Arc::new(transport))
        .with_priority(&config.dispatch.priority)
        .context("invalid dispatch.priority in config")
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool, default_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("lumina=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
