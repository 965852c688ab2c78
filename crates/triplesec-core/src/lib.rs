//! # TripleSec Core
//!
//! Core library for TripleSec - passphrase-based, layered file encryption.
//!
//! This crate holds the domain logic independent of the CLI: passphrase
//! acquisition, the cipher capability and its TripleSec v3 implementation,
//! and the whole-file transform pipeline.
//!
//! ## Architecture
//!
//! - **secret**: Passphrase bytes and the minimum-length policy
//! - **acquire**: Passphrase acquisition state machine (retries, confirmation)
//! - **crypto**: Cipher traits, scrypt key derivation, salts, the v3 container
//! - **pipeline**: One encrypt/decrypt task over a source/destination pair
//! - **progress**: Byte-count progress observer
//! - **fs**: Atomic file writes
//!
//! Every failure is returned as a [`TripleSecError`]; nothing here exits the
//! process.

pub mod acquire;
pub mod crypto;
pub mod error;
pub mod fs;
pub mod pipeline;
pub mod progress;
pub mod secret;

pub use acquire::{acquire_passphrase, SecretReader};
pub use crypto::{Cipher, CipherProvider, KdfParams, TripleSec, TripleSecProvider};
pub use error::{ErrorKind, Result, TripleSecError};
pub use pipeline::{FileTask, Mode, Pipeline, TransformReport, ENCRYPTED_EXTENSION};
pub use progress::{NoProgress, ProgressReporter};
pub use secret::{Secret, MIN_PASSPHRASE_LENGTH};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
