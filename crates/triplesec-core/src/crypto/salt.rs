//! Per-encryption salt generation.

use crate::error::{Result, TripleSecError};

/// Salt length in bytes.
pub const SALT_LENGTH: usize = 16;

/// Random bytes mixed into key derivation, fresh for every encryption.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Salt([u8; SALT_LENGTH]);

impl Salt {
    /// Draw a new salt from the operating system's CSPRNG.
    ///
    /// There is no fallback source: if the OS cannot supply entropy the
    /// caller gets [`TripleSecError::Randomness`].
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; SALT_LENGTH];
        getrandom::getrandom(&mut bytes).map_err(|e| TripleSecError::Randomness(e.to_string()))?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; SALT_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_LENGTH] {
        &self.0
    }
}

impl std::fmt::Debug for Salt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Salt(")?;
        for byte in self.0 {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_salts_never_repeat() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let salt = Salt::generate().unwrap();
            assert!(seen.insert(salt), "salt repeated: {:?}", salt);
        }
    }

    #[test]
    fn test_salt_length() {
        assert_eq!(Salt::generate().unwrap().as_bytes().len(), SALT_LENGTH);
    }

    #[test]
    fn test_debug_is_hex() {
        let salt = Salt::from_bytes([0xab; SALT_LENGTH]);
        assert_eq!(format!("{:?}", salt), format!("Salt({})", "ab".repeat(16)));
    }
}
