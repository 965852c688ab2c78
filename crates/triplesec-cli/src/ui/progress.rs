//! Byte progress bar for reading the source file.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use triplesec_core::ProgressReporter;

use super::context::UiContext;

const BAR_TEMPLATE: &str =
    "{prefix:.bold.dim} [{bar:40.green/white}] {bytes}/{total_bytes} ({bytes_per_sec}, ETA {eta})";

/// indicatif-backed [`ProgressReporter`]. Drawn on stderr, or hidden entirely
/// when the context does not allow animation.
pub struct ByteProgress {
    bar: ProgressBar,
}

impl ByteProgress {
    pub fn new(ctx: &UiContext, label: &str) -> Self {
        let bar = if ctx.allows_progress() {
            ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stderr())
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::with_template(BAR_TEMPLATE) {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_prefix(label.to_string());
        Self { bar }
    }
}

impl ProgressReporter for ByteProgress {
    fn start(&mut self, total_bytes: u64) {
        self.bar.set_length(total_bytes);
        self.bar.set_position(0);
    }

    fn advance(&mut self, bytes: u64) {
        self.bar.inc(bytes);
    }

    fn finish(&mut self) {
        self.bar.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hidden_ctx() -> UiContext {
        UiContext {
            is_tty: false,
            quiet: false,
            progress_enabled: true,
        }
    }

    #[test]
    fn test_tracks_bytes_when_hidden() {
        let mut progress = ByteProgress::new(&hidden_ctx(), "Encrypting");
        progress.start(100);
        progress.advance(40);
        progress.advance(60);
        assert_eq!(progress.bar.length(), Some(100));
        assert_eq!(progress.bar.position(), 100);
        progress.finish();
    }

    #[test]
    fn test_start_resets_position() {
        let mut progress = ByteProgress::new(&hidden_ctx(), "Decrypting");
        progress.start(10);
        progress.advance(10);
        progress.start(20);
        assert_eq!(progress.bar.position(), 0);
        assert_eq!(progress.bar.length(), Some(20));
    }
}
