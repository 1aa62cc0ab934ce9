//! Logging system configuration and initialization
//!
//! - Console output on stdout
//! - A flat log file under the configured log directory (never rotated)
//! - Optional JSON formatting for the file layer
//! - Local-time timestamps
//!
//! `RUST_LOG` overrides the configured level when set.

use anyhow::{Result, anyhow};
use chrono::Local;
use tracing::info;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    EnvFilter, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

pub use crate::infrastructure::config::LoggingConfig;

/// Local time formatter with millisecond precision
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f %:z"))
    }
}

/// Build the filter used when `RUST_LOG` is not set
///
/// Below TRACE, HTTP internals are capped so page fetches stay readable.
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| anyhow!("Invalid log level '{}': {e}", config.level))?;

    if !config.level.to_lowercase().contains("trace") {
        filter = filter
            .add_directive("reqwest=info".parse()?)
            .add_directive("hyper=warn".parse()?)
            .add_directive("hyper_util=warn".parse()?)
            .add_directive("h2=warn".parse()?)
            .add_directive("html5ever=warn".parse()?)
            .add_directive("selectors=warn".parse()?);
    }

    Ok(filter)
}

/// Initialize logging with custom configuration
///
/// The returned guard flushes the file writer when dropped; keep it alive
/// for the whole run.
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    if !config.file_output && !config.console_output {
        return Err(anyhow!("No logging output configured"));
    }

    let env_filter = build_env_filter(config)?;

    let (file_writer, guard) = if config.file_output {
        std::fs::create_dir_all(&config.log_dir).map_err(|e| {
            anyhow!("Failed to create log directory {:?}: {e}", config.log_dir)
        })?;
        let (writer, guard) = non_blocking(rolling::never(&config.log_dir, &config.file_name));
        (Some(writer), Some(guard))
    } else {
        (None, None)
    };

    let json_file_layer = file_writer
        .clone()
        .filter(|_| config.json_format)
        .map(|writer| {
            fmt::Layer::new()
                .json()
                .with_writer(writer)
                .with_timer(LocalTimeFormatter)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_ansi(false)
        });

    let plain_file_layer = file_writer
        .filter(|_| !config.json_format)
        .map(|writer| {
            fmt::Layer::new()
                .with_writer(writer)
                .with_timer(LocalTimeFormatter)
                .with_target(false)
                .with_ansi(false)
        });

    let console_layer = config.console_output.then(|| {
        fmt::Layer::new()
            .with_writer(std::io::stdout)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
    });

    Registry::default()
        .with(env_filter)
        .with(json_file_layer)
        .with(plain_file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))?;

    info!("Logging system initialized");
    info!("Log level: {}", config.level);
    if config.file_output {
        info!(
            "Log file: {:?} (json: {})",
            config.log_dir.join(&config.file_name),
            config.json_format
        );
    }

    Ok(guard)
}

/// Log system information for diagnostics
pub fn log_system_info() {
    info!("=== Card Collector System Information ===");
    info!("Application version: {}", env!("CARGO_PKG_VERSION"));
    info!("Operating system: {}", std::env::consts::OS);
    info!("Architecture: {}", std::env::consts::ARCH);

    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {:?}", current_dir);
    }
    info!("==========================================");
}
