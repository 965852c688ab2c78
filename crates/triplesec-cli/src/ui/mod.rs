//! UI primitives for the TripleSec CLI.
//!
//! - **Context**: Environment detection (TTY, quiet, progress setting)
//! - **Progress**: indicatif byte progress bar implementing the core reporter

mod context;
pub mod progress;

pub use context::UiContext;
pub use progress::ByteProgress;
