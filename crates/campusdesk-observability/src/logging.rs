use std::fs;

use anyhow::Context;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::basic_logging::{default_filter, init_basic_console_logging};
use crate::is_observability_enabled;

const LOG_DIR: &str = "storage/logs";

/// Initialize console, error-file and JSON-file logging.
///
/// - console: compact, filtered by `RUST_LOG` / `LOG_LEVEL`
/// - `storage/logs/campusdesk.log`: errors only, rotated daily
/// - `storage/logs/campusdesk.json`: structured info logs, rotated daily
///
/// Falls back to console-only logging when `OBSERVABILITY_ENABLED=false`.
pub fn init_tracing() -> anyhow::Result<()> {
    if !is_observability_enabled() {
        init_basic_console_logging();
        return Ok(());
    }

    fs::create_dir_all(LOG_DIR)
        .with_context(|| format!("Failed to create logs directory {LOG_DIR}"))?;

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let console_layer = fmt::layer()
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .with_filter(default_filter(&log_level));

    let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "campusdesk.log");
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_filter(EnvFilter::new("error"));

    let json_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, "campusdesk.json");
    let json_layer = fmt::layer()
        .json()
        .with_writer(json_appender)
        .with_current_span(true)
        .with_span_list(true)
        .with_filter(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .with(json_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(log_dir = LOG_DIR, "Tracing initialized with file logging");
    Ok(())
}
