//! Trackhook Logging
//!
//! Process-wide structured logging for the trackhook binaries plus the
//! daily, append-only diagnostic files written by the webhook endpoint.
//!
//! # Usage
//!
//! ```rust,no_run
//! use trackhook_log::{DailyFile, LogConfig};
//!
//! LogConfig::from_env().init();
//! tracing::info!(port = 8080, "server starting");
//!
//! let events = DailyFile::new("logs", "events");
//! events.append_json(&serde_json::json!({"message": "hello"})).unwrap();
//! ```
//!
//! # Environment Variables
//!
//! - `TRACKHOOK_DEBUG=1` - Enable debug logging
//! - `TRACKHOOK_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `TRACKHOOK_LOG_FORMAT=pretty|json|compact` - Set output format
//! - `TRACKHOOK_LOG_COLOR=1|0` - Enable/disable colors
//! - `RUST_LOG` - Full filter directive, overrides the level

mod daily;

pub use daily::DailyFile;

use once_cell::sync::Lazy;
use std::env;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// ============================================================================
// Log Levels
// ============================================================================

/// Minimum level emitted by the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    /// Trace level (most verbose)
    Trace = 0,
    /// Debug level
    Debug = 1,
    /// Info level
    Info = 2,
    /// Warning level
    Warn = 3,
    /// Error level (least verbose)
    Error = 4,
    /// Off (no logging)
    Off = 5,
}

impl Level {
    /// Get level from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    /// Directive understood by `EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Off => "off",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_filter().to_uppercase())
    }
}

// ============================================================================
// Log Format
// ============================================================================

/// Output format for log messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Multi-line human readable output
    Pretty,
    /// Compact single-line format
    Compact,
    /// JSON format for structured logging
    Json,
}

impl Format {
    /// Get format from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

static CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::from_env);

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level
    pub level: Level,
    /// Output format
    pub format: Format,
    /// Whether ANSI colors are enabled
    pub color: bool,
    /// Whether to include the event target (module path)
    pub targets: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::Info,
            format: Format::Json,
            color: false,
            targets: true,
        }
    }
}

impl LogConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let debug = flag("TRACKHOOK_DEBUG").unwrap_or(false);

        let level = env::var("TRACKHOOK_LOG_LEVEL")
            .ok()
            .and_then(|s| Level::from_str(&s))
            .unwrap_or(if debug { Level::Debug } else { Level::Info });

        let format = env::var("TRACKHOOK_LOG_FORMAT")
            .ok()
            .and_then(|s| Format::from_str(&s))
            .unwrap_or(Format::Json);

        let color = flag("TRACKHOOK_LOG_COLOR")
            .unwrap_or_else(|| env::var("NO_COLOR").is_err() && env::var("TERM").is_ok());

        Self {
            level,
            format,
            color: color && format != Format::Json,
            targets: true,
        }
    }

    /// Set the minimum level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set the output format.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Enable or disable ANSI colors.
    pub fn with_colors(mut self, enable: bool) -> Self {
        self.color = enable;
        self
    }

    /// Install the global subscriber, writing to stderr.
    ///
    /// Returns `false` when a subscriber was already installed (for example
    /// when several tests initialise logging in one process).
    pub fn init(&self) -> bool {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.as_filter()));

        let registry = tracing_subscriber::registry().with(filter);

        let result = match self.format {
            Format::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_target(self.targets)
                        .with_writer(std::io::stderr),
                )
                .try_init(),
            Format::Pretty => registry
                .with(
                    fmt::layer()
                        .pretty()
                        .with_ansi(self.color)
                        .with_target(self.targets)
                        .with_writer(std::io::stderr),
                )
                .try_init(),
            Format::Compact => registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_ansi(self.color)
                        .with_target(self.targets)
                        .with_writer(std::io::stderr),
                )
                .try_init(),
        };

        result.is_ok()
    }
}

fn flag(name: &str) -> Option<bool> {
    env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Get the configuration derived from the environment.
pub fn config() -> &'static LogConfig {
    &CONFIG
}

/// Initialize logging from the environment.
pub fn init() -> bool {
    config().init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Off);
    }

    #[test]
    fn test_level_from_str() {
        assert_eq!(Level::from_str("debug"), Some(Level::Debug));
        assert_eq!(Level::from_str("DEBUG"), Some(Level::Debug));
        assert_eq!(Level::from_str("warning"), Some(Level::Warn));
        assert_eq!(Level::from_str("none"), Some(Level::Off));
        assert_eq!(Level::from_str("invalid"), None);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(Format::from_str("pretty"), Some(Format::Pretty));
        assert_eq!(Format::from_str("Compact"), Some(Format::Compact));
        assert_eq!(Format::from_str("json"), Some(Format::Json));
        assert_eq!(Format::from_str("xml"), None);
    }

    #[test]
    fn test_builder() {
        let config = LogConfig::default()
            .level(Level::Debug)
            .format(Format::Compact)
            .with_colors(true);

        assert_eq!(config.level, Level::Debug);
        assert_eq!(config.format, Format::Compact);
        assert!(config.color);
        assert_eq!(config.level.to_string(), "DEBUG");
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = LogConfig::default().level(Level::Off);
        config.init();
        assert!(!config.init());
    }
}
