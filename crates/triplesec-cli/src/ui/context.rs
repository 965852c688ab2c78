//! UI context for environment detection and configuration.

use std::io::IsTerminal;

/// Terminal and environment context for UI decisions.
#[derive(Debug, Clone)]
pub struct UiContext {
    /// Whether stderr (where progress is drawn) is a TTY
    pub is_tty: bool,
    /// `--quiet` was passed
    pub quiet: bool,
    /// `[progress] enabled` from the config
    pub progress_enabled: bool,
}

impl UiContext {
    /// Create context from the environment, CLI flags and config.
    pub fn from_env(quiet: bool, progress_enabled: bool) -> Self {
        let is_tty = std::io::stderr().is_terminal();
        let term_is_dumb = std::env::var("TERM").map(|v| v == "dumb").unwrap_or(false);
        Self {
            is_tty: is_tty && !term_is_dumb,
            quiet,
            progress_enabled,
        }
    }

    /// Check if a progress bar should be drawn.
    pub fn allows_progress(&self) -> bool {
        self.is_tty && !self.quiet && self.progress_enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(is_tty: bool, quiet: bool, progress_enabled: bool) -> UiContext {
        UiContext {
            is_tty,
            quiet,
            progress_enabled,
        }
    }

    #[test]
    fn test_progress_needs_tty() {
        assert!(ctx(true, false, true).allows_progress());
        assert!(!ctx(false, false, true).allows_progress());
    }

    #[test]
    fn test_quiet_hides_progress() {
        assert!(!ctx(true, true, true).allows_progress());
    }

    #[test]
    fn test_config_can_disable_progress() {
        assert!(!ctx(true, false, false).allows_progress());
    }
}
