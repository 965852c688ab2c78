//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (randomness, cipher construction, config, anything unclassified)
/// - 2: Misuse of shell command (reserved by shells, used by clap)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Unclassified failure.
    pub const GENERAL: i32 = 1;

    /// Source file (or destination directory) not found.
    pub const NOT_FOUND: i32 = 3;

    /// Passphrase policy violated (too short, confirmation mismatch).
    pub const POLICY_VIOLATION: i32 = 4;

    /// Encryption or decryption failed (wrong passphrase, corrupt file).
    pub const CIPHER_FAILED: i32 = 5;

    /// Any other file I/O failure.
    pub const IO_FAILED: i32 = 6;

    /// No passphrase could be read.
    pub const INPUT_UNAVAILABLE: i32 = 7;
}

/// Environment variables consulted by the CLI.
pub mod env_vars {
    /// Passphrase used for every read instead of prompting.
    pub const PASSPHRASE: &str = "TRIPLESEC_PASSPHRASE";

    /// Comma-separated scripted entries (only with the `test-support` feature).
    pub const TEST_PASSPHRASE_ATTEMPTS: &str = "TRIPLESEC_TEST_PASSPHRASE_ATTEMPTS";

    /// Config file override (same as `--config`).
    pub const CONFIG: &str = "TRIPLESEC_CONFIG";
}

/// Log level used when neither `--debug`, `RUST_LOG` nor the config set one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";
