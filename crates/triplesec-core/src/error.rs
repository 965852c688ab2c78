//! Error types for TripleSec core operations.
//!
//! Every fatal condition in the core is a variant here. Nothing in this crate
//! terminates the process; the CLI maps these to exit codes.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for TripleSec operations.
pub type Result<T> = std::result::Result<T, TripleSecError>;

/// Broad failure classes, used by callers to decide how to report an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Passphrase too short or confirmation mismatch
    PolicyViolation,
    /// The secret could not be read from the operator
    InputUnavailable,
    /// The OS entropy source failed
    RandomnessFailure,
    /// The cipher rejected the secret or salt
    CipherConstruction,
    /// Encryption or decryption failed (wrong passphrase, tampering, bad format)
    CipherTransform,
    /// File open/stat/read/write failure
    IoFailure,
}

/// Core error type for TripleSec operations.
#[derive(Debug, Error)]
pub enum TripleSecError {
    /// Passphrase shorter than the policy minimum
    #[error("Passphrase must be at least {min} characters")]
    PassphraseTooShort { min: usize },

    /// Every allowed attempt produced a short passphrase
    #[error("Passphrase must be at least {min} characters, too many tries ({attempts})")]
    TooManyShortAttempts { min: usize, attempts: u32 },

    /// The confirmation entry did not match the first entry
    #[error("Passphrases did not match")]
    ConfirmationMismatch,

    /// The secret-input collaborator failed
    #[error("Unable to obtain passphrase: {0}")]
    InputUnavailable(String),

    /// Secure random bytes could not be generated
    #[error("Could not create random salt: {0}")]
    Randomness(String),

    /// Cipher construction rejected its inputs
    #[error("Error creating cipher: {0}")]
    CipherConstruction(String),

    /// Encryption or decryption failed
    #[error("Cipher error: {0}")]
    CipherTransform(String),

    /// File operation failed
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TripleSecError {
    /// Classify this error into its failure class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            TripleSecError::PassphraseTooShort { .. }
            | TripleSecError::TooManyShortAttempts { .. }
            | TripleSecError::ConfirmationMismatch => ErrorKind::PolicyViolation,
            TripleSecError::InputUnavailable(_) => ErrorKind::InputUnavailable,
            TripleSecError::Randomness(_) => ErrorKind::RandomnessFailure,
            TripleSecError::CipherConstruction(_) => ErrorKind::CipherConstruction,
            TripleSecError::CipherTransform(_) => ErrorKind::CipherTransform,
            TripleSecError::Io { .. } => ErrorKind::IoFailure,
        }
    }

    /// Wrap an I/O error together with the path it happened on.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        TripleSecError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// True when the underlying I/O error is "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TripleSecError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            TripleSecError::ConfirmationMismatch.kind(),
            ErrorKind::PolicyViolation
        );
        assert_eq!(
            TripleSecError::CipherTransform("bad mac".into()).kind(),
            ErrorKind::CipherTransform
        );
        assert_eq!(
            TripleSecError::InputUnavailable("no tty".into()).kind(),
            ErrorKind::InputUnavailable
        );
    }

    #[test]
    fn test_io_error_reports_path() {
        let err = TripleSecError::io(
            "/tmp/missing.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        assert!(err.is_not_found());
        assert_eq!(err.kind(), ErrorKind::IoFailure);
        assert!(err.to_string().contains("/tmp/missing.txt"));
    }
}
