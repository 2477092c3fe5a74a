//! Logging pipeline: compact or JSON `fmt` layer on stderr, filtered by `EnvFilter`.
//!
//! - `SB_LOG_LEVEL`: any `EnvFilter` directive (default `warn`, so stdout stays clean)
//! - `SB_LOG_FORMAT`: `compact` (default) or `json`
//!
//! Initialisation happens once per process; later calls are no-ops.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGING_CONFIG: OnceLock<LoggingConfig> = OnceLock::new();

pub const DEFAULT_LEVEL: &str = "warn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable compact format
    Compact,
    /// Machine-readable JSON format
    Json,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("SB_LOG_FORMAT").ok().as_deref(),
            std::env::var("SB_LOG_LEVEL").ok().as_deref(),
        )
    }

    fn from_vars(format: Option<&str>, level: Option<&str>) -> Self {
        let format = match format.unwrap_or("compact") {
            "json" => LogFormat::Json,
            _ => LogFormat::Compact,
        };
        let level = level
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LEVEL)
            .to_string();
        Self { format, level }
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init_logging() {
    let config = LOGGING_CONFIG.get_or_init(LoggingConfig::from_env);
    let env_filter =
        EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let layer = match config.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(env_filter)
            .boxed(),
    };
    // a subscriber installed earlier (tests, embedding) wins
    let _ = tracing_subscriber::registry().with(layer).try_init();

    tracing::debug!(format = ?config.format, level = %config.level, "logging initialized");
}
