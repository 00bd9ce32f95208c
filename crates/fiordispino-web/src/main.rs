//! Fiordispino - session-aware web front for the game library service.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fiordispino_web::config::{WebConfig, ENV_LOG_DIR};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file name prefix inside the log directory
const LOG_FILE_PREFIX: &str = "fiordispino.log";

/// Initialize the tracing subscriber for logging.
/// The returned guard flushes the file writer and must outlive the server.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let log_dir = std::env::var_os(ENV_LOG_DIR).map(PathBuf::from);
    let _guard = init_tracing(log_dir.as_deref());
    info!("Fiordispino starting");

    let config = WebConfig::load().context("Failed to load configuration")?;
    fiordispino_web::serve(config).await
}
