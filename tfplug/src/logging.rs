//! Logging setup for providers
//!
//! Logs go to stderr; stdout belongs to the plugin host. The filter comes
//! from `RUST_LOG` when set, otherwise from Terraform's `TF_LOG` level, and
//! falls back to the level passed in.

use std::str::FromStr;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log level for providers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    /// Accepts Terraform's `TF_LOG` values; `JSON` means trace
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TRACE" | "JSON" => Ok(LogLevel::Trace),
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

/// Filter directive from `RUST_LOG`, then `TF_LOG`, then `default`
pub fn filter_directive(rust_log: Option<&str>, tf_log: Option<&str>, default: LogLevel) -> String {
    if let Some(directive) = rust_log.filter(|s| !s.trim().is_empty()) {
        return directive.to_string();
    }
    tf_log
        .and_then(|level| level.parse::<LogLevel>().ok())
        .unwrap_or(default)
        .as_str()
        .to_string()
}

/// Install the global subscriber. Returns false when one is already set,
/// so tests and repeated initialisation are harmless.
pub fn init_logging(default: LogLevel) -> bool {
    let rust_log = std::env::var("RUST_LOG").ok();
    let tf_log = std::env::var("TF_LOG").ok();
    let directive = filter_directive(rust_log.as_deref(), tf_log.as_deref(), default);

    let filter = EnvFilter::try_new(&directive)
        .unwrap_or_else(|_| EnvFilter::new(default.as_str()));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_log_wins() {
        assert_eq!(
            filter_directive(Some("baremetal=debug"), Some("TRACE"), LogLevel::Info),
            "baremetal=debug"
        );
    }

    #[test]
    fn tf_log_levels() {
        assert_eq!(
            filter_directive(None, Some("DEBUG"), LogLevel::Info),
            "debug"
        );
        assert_eq!(
            filter_directive(None, Some("json"), LogLevel::Info),
            "trace"
        );
        assert_eq!(
            filter_directive(Some(" "), Some("bogus"), LogLevel::Warn),
            "warn"
        );
        assert_eq!(filter_directive(None, None, LogLevel::Info), "info");
    }

    #[test]
    fn init_twice_is_harmless() {
        init_logging(LogLevel::Error);
        assert!(!init_logging(LogLevel::Error));
    }
}
