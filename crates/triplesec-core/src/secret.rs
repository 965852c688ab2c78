//! Passphrase bytes and the length policy they must satisfy.

use secrecy::{ExposeSecret, SecretSlice};

use crate::error::{Result, TripleSecError};

/// Minimum passphrase length in bytes.
pub const MIN_PASSPHRASE_LENGTH: usize = 12;

/// Operator-supplied passphrase bytes.
///
/// The bytes are zeroized when the value is dropped and never appear in
/// `Debug` output.
pub struct Secret {
    bytes: SecretSlice<u8>,
}

impl Secret {
    /// Wrap raw passphrase bytes. No policy is applied here.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: SecretSlice::from(bytes),
        }
    }

    /// Borrow the raw bytes for immediate use (key derivation).
    pub fn expose(&self) -> &[u8] {
        self.bytes.expose_secret()
    }

    pub fn len(&self) -> usize {
        self.expose().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Secret::new(value.as_bytes().to_vec())
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Secret")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Check that a passphrase meets the minimum length.
///
/// # Examples
///
/// ```
/// use triplesec_core::secret::validate_passphrase;
///
/// assert!(validate_passphrase(b"correcthorsebattery").is_ok());
/// assert!(validate_passphrase(b"short").is_err());
/// ```
pub fn validate_passphrase(passphrase: &[u8]) -> Result<()> {
    if passphrase.len() < MIN_PASSPHRASE_LENGTH {
        return Err(TripleSecError::PassphraseTooShort {
            min: MIN_PASSPHRASE_LENGTH,
        });
    }
    Ok(())
}
