//! Cryptographic operations for TripleSec.
//!
//! The pipeline only sees the [`Cipher`] and [`CipherProvider`] capabilities.
//! The shipped implementation is a TripleSec v3 container:
//! - **scrypt** derives five keys from the passphrase and a 16-byte salt
//! - **XSalsa20**, **Twofish-CTR** and **AES-256-CTR** are layered, innermost first
//! - **HMAC-SHA-512** and **HMAC-Keccak-512** both authenticate the result
//!
//! ## Threat Model
//!
//! We defend against:
//! - Theft or tampering of an encrypted file
//! - Offline brute-force attacks on the passphrase
//! - A break of any single cipher or MAC primitive
//!
//! We do NOT defend against:
//! - Compromised OS / keylogger
//! - Access to process memory while a file is being transformed

pub mod kdf;
pub mod salt;
pub mod triplesec;

pub use kdf::{derive_keys, DerivedKeys, KdfParams};
pub use salt::{Salt, SALT_LENGTH};
pub use triplesec::{TripleSec, TripleSecProvider, MAGIC_BYTES, OVERHEAD};

use crate::error::Result;

/// An encryption engine bound to one secret (and, for encryption, one salt).
pub trait Cipher {
    fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>>;
    fn decrypt(&mut self, ciphertext: &[u8]) -> Result<Vec<u8>>;
}

/// Builds a [`Cipher`] from a secret and an optional salt.
///
/// Decryption passes `None`; the container must carry its own salt.
pub trait CipherProvider {
    type Cipher: Cipher;

    fn new_cipher(&self, secret: &[u8], salt: Option<&[u8]>) -> Result<Self::Cipher>;
}
