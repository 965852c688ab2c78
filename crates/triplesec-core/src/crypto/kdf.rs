//! Key derivation using scrypt.
//!
//! One scrypt run yields the keys for all five primitives of the container:
//! two MAC keys and three cipher keys.

use zeroize::ZeroizeOnDrop;

use crate::error::{Result, TripleSecError};

/// Length of each HMAC key in bytes.
pub const MAC_KEY_LENGTH: usize = 48;

/// Length of each cipher key in bytes.
pub const CIPHER_KEY_LENGTH: usize = 32;

/// Total derived length: two MAC keys and three cipher keys.
pub const DERIVED_KEY_LENGTH: usize = 2 * MAC_KEY_LENGTH + 3 * CIPHER_KEY_LENGTH;

/// scrypt cost parameters.
///
/// Containers do not record these; data encrypted with one set can only be
/// decrypted with the same set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

impl KdfParams {
    pub const fn new(log_n: u8, r: u32, p: u32) -> Self {
        Self { log_n, r, p }
    }
}

impl Default for KdfParams {
    /// N = 2^15, r = 8, p = 1 (TripleSec v3).
    fn default() -> Self {
        Self::new(15, 8, 1)
    }
}

/// Keys for every layer of one container, zeroized on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct DerivedKeys {
    bytes: [u8; DERIVED_KEY_LENGTH],
}

impl DerivedKeys {
    pub fn hmac_sha512(&self) -> &[u8] {
        &self.bytes[..MAC_KEY_LENGTH]
    }

    pub fn hmac_keccak512(&self) -> &[u8] {
        &self.bytes[MAC_KEY_LENGTH..2 * MAC_KEY_LENGTH]
    }

    pub fn aes(&self) -> &[u8] {
        let start = 2 * MAC_KEY_LENGTH;
        &self.bytes[start..start + CIPHER_KEY_LENGTH]
    }

    pub fn twofish(&self) -> &[u8] {
        let start = 2 * MAC_KEY_LENGTH + CIPHER_KEY_LENGTH;
        &self.bytes[start..start + CIPHER_KEY_LENGTH]
    }

    pub fn xsalsa20(&self) -> &[u8] {
        let start = 2 * MAC_KEY_LENGTH + 2 * CIPHER_KEY_LENGTH;
        &self.bytes[start..]
    }
}

impl std::fmt::Debug for DerivedKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKeys")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive the container keys from a passphrase and salt.
///
/// Same passphrase, salt and parameters always give the same keys.
pub fn derive_keys(passphrase: &[u8], salt: &[u8], params: KdfParams) -> Result<DerivedKeys> {
    // The length argument only matters for PHC hashes; output length comes from the buffer.
    let scrypt_params = scrypt::Params::new(
        params.log_n,
        params.r,
        params.p,
        scrypt::Params::RECOMMENDED_LEN,
    )
    .map_err(|e| TripleSecError::CipherConstruction(format!("Invalid scrypt params: {}", e)))?;

    let mut bytes = [0u8; DERIVED_KEY_LENGTH];
    scrypt::scrypt(passphrase, salt, &scrypt_params, &mut bytes)
        .map_err(|e| TripleSecError::CipherConstruction(format!("Key derivation failed: {}", e)))?;

    Ok(DerivedKeys { bytes })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST: KdfParams = KdfParams::new(4, 8, 1);

    #[test]
    fn test_key_derivation_deterministic() {
        let salt = b"unique-salt-16by";
        let key1 = derive_keys(b"test-passphrase", salt, FAST).unwrap();
        let key2 = derive_keys(b"test-passphrase", salt, FAST).unwrap();
        assert_eq!(key1.aes(), key2.aes());
        assert_eq!(key1.hmac_keccak512(), key2.hmac_keccak512());
    }

    #[test]
    fn test_different_salt_different_key() {
        let key1 = derive_keys(b"test-passphrase", b"salt1-1234567890", FAST).unwrap();
        let key2 = derive_keys(b"test-passphrase", b"salt2-1234567890", FAST).unwrap();
        assert_ne!(key1.xsalsa20(), key2.xsalsa20());
    }

    #[test]
    fn test_key_slices_partition_output() {
        let keys = derive_keys(b"test-passphrase", b"salt-1234567890!", FAST).unwrap();
        assert_eq!(keys.hmac_sha512().len(), MAC_KEY_LENGTH);
        assert_eq!(keys.hmac_keccak512().len(), MAC_KEY_LENGTH);
        assert_eq!(keys.aes().len(), CIPHER_KEY_LENGTH);
        assert_eq!(keys.twofish().len(), CIPHER_KEY_LENGTH);
        assert_eq!(keys.xsalsa20().len(), CIPHER_KEY_LENGTH);
        assert_ne!(keys.aes(), keys.twofish());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = derive_keys(b"test-passphrase", b"salt-1234567890!", KdfParams::new(4, 0, 1));
        assert!(matches!(result, Err(TripleSecError::CipherConstruction(_))));
    }

    #[test]
    fn test_derived_keys_debug_redacts() {
        let keys = derive_keys(b"test-passphrase", b"salt-1234567890!", FAST).unwrap();
        let debug_output = format!("{:?}", keys);
        assert!(debug_output.contains("REDACTED"));
        let key_hex = hex::encode(&keys.aes()[..4]);
        assert!(!debug_output.contains(&key_hex));
    }
}
