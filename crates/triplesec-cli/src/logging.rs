//! Per-invocation `tracing` setup.
//!
//! The subscriber is returned as a [`Dispatch`] and installed only for the
//! duration of the command (see `main`), never as a process-global default.
//! Logs go to stderr so stdout stays clean for command output.

use tracing::Dispatch;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingSection};
use crate::constants::DEFAULT_LOG_LEVEL;

/// Build the dispatcher for this run.
pub fn build_dispatch(debug: bool, settings: &LoggingSection) -> Dispatch {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = filter_directive(debug, rust_log.as_deref(), &settings.level);
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match settings.format {
        LogFormat::Json => Dispatch::new(builder.json().finish()),
        LogFormat::Text => Dispatch::new(builder.finish()),
    }
}

/// `--debug` wins, then `RUST_LOG`, then the configured level.
fn filter_directive<'a>(debug: bool, rust_log: Option<&'a str>, configured: &'a str) -> &'a str {
    if debug {
        return "debug";
    }
    if let Some(value) = rust_log.filter(|v| !v.trim().is_empty()) {
        return value;
    }
    if configured.trim().is_empty() {
        return DEFAULT_LOG_LEVEL;
    }
    configured
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_flag_wins() {
        assert_eq!(filter_directive(true, Some("trace"), "error"), "debug");
    }

    #[test]
    fn test_rust_log_over_config() {
        assert_eq!(filter_directive(false, Some("info"), "error"), "info");
    }

    #[test]
    fn test_blank_rust_log_ignored() {
        assert_eq!(filter_directive(false, Some("  "), "error"), "error");
    }

    #[test]
    fn test_blank_config_falls_back() {
        assert_eq!(filter_directive(false, None, ""), "warn");
    }

    #[test]
    fn test_dispatch_scoped_to_closure() {
        let dispatch = build_dispatch(true, &LoggingSection::default());
        let enabled = tracing::dispatcher::with_default(&dispatch, || {
            tracing::enabled!(tracing::Level::DEBUG)
        });
        assert!(enabled);
    }
}
