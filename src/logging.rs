//! Structured logging setup for the `brrtcrud-gen` binary
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the binary (or to whatever host embeds the library). Output goes to stderr
//! so stdout stays free for reports such as `inspect` tables.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `BRRTCRUD_LOG_LEVEL` | `info` | trace/debug/info/warn/error |
//! | `BRRTCRUD_LOG_FORMAT` | `pretty` | `json` or `pretty` |
//! | `BRRTCRUD_LOG_TARGET_FILTER` | unset | extra comma-separated filter directives |
//! | `BRRTCRUD_LOG_INCLUDE_LOCATION` | `false` | include file and line |
//!
//! `RUST_LOG`, when set, replaces the level.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for pipelines, pretty-print for terminals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    /// Log format: json/pretty
    pub format: LogFormat,
    /// Module filter (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`LogConfig::from_env`] with an injectable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            log_level: lookup("BRRTCRUD_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            format: LogFormat::parse(
                &lookup("BRRTCRUD_LOG_FORMAT").unwrap_or_else(|| "pretty".to_string()),
            ),
            target_filter: lookup("BRRTCRUD_LOG_TARGET_FILTER"),
            include_location: lookup("BRRTCRUD_LOG_INCLUDE_LOCATION")
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }

    /// Raise the level to `debug` for `--verbose` runs
    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose && matches!(self.log_level.to_lowercase().as_str(), "info" | "warn" | "error") {
            self.log_level = "debug".to_string();
        }
        self
    }

    fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// Filter built from the level, `RUST_LOG` and the target directives
    pub fn env_filter(&self) -> EnvFilter {
        let mut env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));

        if let Some(target_filter) = &self.target_filter {
            for filter in target_filter.split(',') {
                let filter = filter.trim();
                if filter.is_empty() {
                    continue;
                }
                if let Ok(directive) = filter.parse() {
                    env_filter = env_filter.add_directive(directive);
                } else {
                    eprintln!("Warning: Invalid log filter directive: {}", filter);
                }
            }
        }
        env_filter
    }
}

/// Install the global subscriber
///
/// Fails when a global subscriber is already installed.
///
/// ```rust,no_run
/// use brrtcrud::logging::{init_logging_with_config, LogConfig};
///
/// init_logging_with_config(&LogConfig::from_env())?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logging_with_config(config: &LogConfig) -> Result<()> {
    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")
}
