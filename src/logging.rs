//! Tracing subscriber setup for the generator binary.
//!
//! Configuration comes from environment variables:
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `RESTPROVIDER_LOG_LEVEL` | trace/debug/info/warn/error | `info` |
//! | `RESTPROVIDER_LOG_FORMAT` | json/pretty | `pretty` |
//! | `RESTPROVIDER_LOG_ASYNC` | true/false | `false` |
//! | `RESTPROVIDER_LOG_TARGET_FILTER` | comma-separated directives | unset |
//! | `RESTPROVIDER_LOG_INCLUDE_LOCATION` | true/false | `false` |
//!
//! `RUST_LOG`, when set, takes precedence over the level. Everything is
//! written to stderr so that `plan` output on stdout stays clean.

use anyhow::{Context, Result};
use std::env;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Log format: JSON for machines, pretty-print for people
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
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Write through a background thread (`tracing-appender`)
    pub async_logging: bool,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Pretty,
            async_logging: false,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup; unparsable values fall
    /// back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| {
            lookup(key)
                .and_then(|s| s.trim().to_lowercase().parse().ok())
                .unwrap_or(default)
        };
        Self {
            log_level: lookup("RESTPROVIDER_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: lookup("RESTPROVIDER_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            async_logging: flag("RESTPROVIDER_LOG_ASYNC", defaults.async_logging),
            target_filter: lookup("RESTPROVIDER_LOG_TARGET_FILTER").filter(|s| !s.trim().is_empty()),
            include_location: flag("RESTPROVIDER_LOG_INCLUDE_LOCATION", defaults.include_location),
        }
    }

    /// The configured level, `INFO` when unrecognised.
    pub fn level(&self) -> Level {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    }

    /// Filter from `RUST_LOG` or the configured level, plus the target directives.
    pub fn env_filter(&self) -> EnvFilter {
        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.level().as_str()));
        if let Some(targets) = &self.target_filter {
            for directive in targets.split(',').map(str::trim).filter(|d| !d.is_empty()) {
                match directive.parse() {
                    Ok(directive) => filter = filter.add_directive(directive),
                    Err(_) => eprintln!("Warning: Invalid log filter directive: {directive}"),
                }
            }
        }
        filter
    }
}

/// Install the global subscriber using [`LogConfig::from_env`].
pub fn init_logging() -> Result<Option<WorkerGuard>> {
    init_logging_with_config(&LogConfig::from_env())
}

/// Install the global subscriber.
///
/// With async logging the returned guard must be held until exit; dropping
/// it flushes pending records.
pub fn init_logging_with_config(config: &LogConfig) -> Result<Option<WorkerGuard>> {
    let (writer, guard) = if config.async_logging {
        let (non_blocking, guard) = tracing_appender::non_blocking(std::io::stderr());
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(non_blocking), Some(guard))
    } else {
        (tracing_subscriber::fmt::writer::BoxMakeWriter::new(std::io::stderr), None)
    };

    let fmt_layer = match config.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer()
            .pretty()
            .with_target(false)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(config.env_filter())
        .with(fmt_layer)
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> LogConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LogConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("invalid"), LogFormat::Pretty);
    }

    #[test]
    fn test_defaults_without_variables() {
        assert_eq!(config_from(&[]), LogConfig::default());
    }

    #[test]
    fn test_variables_are_read() {
        let config = config_from(&[
            ("RESTPROVIDER_LOG_LEVEL", "debug"),
            ("RESTPROVIDER_LOG_FORMAT", "json"),
            ("RESTPROVIDER_LOG_ASYNC", "TRUE"),
            ("RESTPROVIDER_LOG_TARGET_FILTER", "restprovider::resolve=trace"),
            ("RESTPROVIDER_LOG_INCLUDE_LOCATION", "yes"),
        ]);
        assert_eq!(config.level(), Level::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert!(config.async_logging);
        assert_eq!(
            config.target_filter.as_deref(),
            Some("restprovider::resolve=trace")
        );
        // not a bool, default kept
        assert!(!config.include_location);
    }

    #[test]
    fn test_unknown_level_is_info() {
        let config = config_from(&[("RESTPROVIDER_LOG_LEVEL", "loud")]);
        assert_eq!(config.level(), Level::INFO);
    }
}
