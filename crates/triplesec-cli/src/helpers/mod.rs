//! Input helper functions for the CLI.
//!
//! This module provides the passphrase readers (`input`) that feed the core
//! acquisition state machine.

mod input;

// Re-export public API
pub use input::PassphraseSource;
