//! Logging setup built on the tracing ecosystem.
//!
//! Every diagnostic in chatline is a `tracing` event. How those events are
//! delivered depends on the host:
//!
//! - Native hosts (tests, server-side tooling) install a `tracing-subscriber`
//!   registry through [`init_logging`].
//! - Browser builds enable the `log` bridge of `tracing`, and the page
//!   bootstrap forwards `log` records to the developer console.
//!
//! # Environment Variables (native only)
//!
//! - `CHATLINE_LOG`: Filter directive (like `RUST_LOG`), e.g., `chatline_ui=debug`
//! - `CHATLINE_LOG_FORMAT`: Output format for stderr: `pretty`, `json`, `compact`
//!
//! # Example
//!
//! ```no_run
//! use chatline_core::config::LoggingConfig;
//! use chatline_core::logging;
//!
//! logging::init_logging(Some(LoggingConfig::default().with_level("debug")))?;
//! # Ok::<(), chatline_core::Error>(())
//! ```

use serde::{Deserialize, Serialize};

/// Captured text longer than this is shortened in log records.
pub const LOG_PREVIEW_CHARS: usize = 80;

/// Log output format for stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Pretty, human-readable output with colors
    #[default]
    Pretty,
    /// JSON output (one line per event)
    Json,
    /// Compact, single-line output
    Compact,
}

impl LogFormat {
    /// All available log formats.
    pub const VALUES: &[LogFormat] = &[LogFormat::Pretty, LogFormat::Json, LogFormat::Compact];

    /// Parse a log format from a string.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json" => Some(LogFormat::Json),
            "compact" => Some(LogFormat::Compact),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
            LogFormat::Compact => "compact",
        }
    }
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Shorten chat content for a log field, keeping the total char count visible.
pub fn truncate_for_log(content: &str) -> String {
    let total = content.chars().count();
    if total <= LOG_PREVIEW_CHARS {
        return content.to_string();
    }

    let mut preview = content.chars().take(LOG_PREVIEW_CHARS).collect::<String>();
    preview.push_str(&format!("... ({} total chars)", total));
    preview
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::init_logging;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::env;
    use std::io;
    use tracing_subscriber::{EnvFilter, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    use super::LogFormat;
    use crate::Error;
    use crate::config::LoggingConfig;

    fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
        let filter = env::var("CHATLINE_LOG")
            .ok()
            .or_else(|| env::var("RUST_LOG").ok())
            .unwrap_or_else(|| config.level.clone());

        EnvFilter::new(filter)
    }

    fn detect_format(config: &LoggingConfig) -> LogFormat {
        env::var("CHATLINE_LOG_FORMAT")
            .ok()
            .and_then(|s| LogFormat::parse_str(&s))
            .unwrap_or(config.format)
    }

    /// Initialize the global tracing subscriber.
    ///
    /// Uses defaults when `config` is `None`. Fails if a global subscriber
    /// has already been installed.
    pub fn init_logging(config: Option<LoggingConfig>) -> Result<(), Error> {
        let config = config.unwrap_or_default();
        let registry = Registry::default().with(build_env_filter(&config));

        let result = match detect_format(&config) {
            LogFormat::Pretty => registry
                .with(fmt::layer().pretty().with_writer(io::stderr).with_ansi(true))
                .try_init(),
            LogFormat::Json => registry.with(fmt::layer().json().with_writer(io::stderr)).try_init(),
            LogFormat::Compact => registry.with(fmt::layer().compact().with_writer(io::stderr)).try_init(),
        };

        result.map_err(|e| Error::Config(format!("Failed to install log subscriber: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_from_str() {
        assert_eq!(LogFormat::parse_str("pretty"), Some(LogFormat::Pretty));
        assert_eq!(LogFormat::parse_str("JSON"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse_str("Compact"), Some(LogFormat::Compact));
        assert_eq!(LogFormat::parse_str("invalid"), None);
    }

    #[test]
    fn test_log_format_as_str_round_trips_values() {
        for format in LogFormat::VALUES {
            assert_eq!(LogFormat::parse_str(format.as_str()), Some(*format));
        }
    }

    #[test]
    fn test_log_format_default() {
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }

    #[test]
    fn test_truncate_short_content_unchanged() {
        assert_eq!(truncate_for_log("Hi there"), "Hi there");
    }

    #[test]
    fn test_truncate_long_content() {
        let long = "é".repeat(100);
        let preview = truncate_for_log(&long);
        assert!(preview.starts_with(&"é".repeat(LOG_PREVIEW_CHARS)));
        assert!(preview.ends_with("... (100 total chars)"));
    }

    #[test]
    fn test_init_logging_twice_fails() {
        let _ = init_logging(Some(crate::config::LoggingConfig::default().with_level("off")));
        let err = init_logging(None).unwrap_err();
        assert!(err.to_string().contains("log subscriber"));
    }
}
