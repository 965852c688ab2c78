//! CLI error types for structured error handling.
//!
//! Core errors and glue errors are folded into [`CliError`] at the edge so
//! every failure maps to a specific exit code.

use std::fmt;

use triplesec_core::{ErrorKind, TripleSecError};

use crate::constants::env_vars;

const CIPHER_HINT: &str =
    "Hint: Check the passphrase, and that the file is an unmodified TripleSec container.";
const NOT_FOUND_HINT: &str = "Hint: Check the path and try again.";

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Source or destination directory missing
    NotFound { message: String, hint: String },

    /// Passphrase rejected by policy
    PolicyViolation(String),

    /// Encrypt/decrypt failed (wrong passphrase, tampering, not a container)
    CipherFailed {
        message: String,
        hint: Option<String>,
    },

    /// No passphrase could be read
    InputUnavailable(String),

    /// Other file I/O failure
    Io(String),

    /// Anything else (entropy, cipher construction, config)
    General(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::CipherFailed { message, hint } => {
                if let Some(h) = hint {
                    write!(f, "{}\n{}", message, h)
                } else {
                    write!(f, "{}", message)
                }
            }
            CliError::PolicyViolation(message)
            | CliError::InputUnavailable(message)
            | CliError::Io(message)
            | CliError::General(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl From<TripleSecError> for CliError {
    fn from(err: TripleSecError) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::IoFailure if err.is_not_found() => CliError::not_found(message, NOT_FOUND_HINT),
            ErrorKind::IoFailure => CliError::Io(message),
            ErrorKind::PolicyViolation => CliError::PolicyViolation(message),
            ErrorKind::InputUnavailable => CliError::InputUnavailable(format!(
                "{}\nHint: Run from a terminal or set {}.",
                message,
                env_vars::PASSPHRASE
            )),
            ErrorKind::CipherTransform => CliError::cipher_failed_with_hint(message, CIPHER_HINT),
            ErrorKind::RandomnessFailure | ErrorKind::CipherConstruction => {
                CliError::General(message)
            }
        }
    }
}

impl CliError {
    /// Create a NotFound error with message and hint.
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    /// Create a CipherFailed error with message and hint.
    pub fn cipher_failed_with_hint(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::CipherFailed {
            message: message.into(),
            hint: Some(hint.into()),
        }
    }

    /// Classify an error bubbled up through `anyhow`.
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        let err = match err.downcast::<CliError>() {
            Ok(cli) => return cli,
            Err(other) => other,
        };
        match err.downcast::<TripleSecError>() {
            Ok(core) => core.into(),
            Err(other) => CliError::General(format!("{:#}", other)),
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        use super::constants::exit_codes;
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::PolicyViolation(_) => exit_codes::POLICY_VIOLATION,
            CliError::CipherFailed { .. } => exit_codes::CIPHER_FAILED,
            CliError::InputUnavailable(_) => exit_codes::INPUT_UNAVAILABLE,
            CliError::Io(_) => exit_codes::IO_FAILED,
            CliError::General(_) => exit_codes::GENERAL,
        }
    }

    /// Print error message to stderr and exit with appropriate code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(self.exit_code())
    }
}
