//! TripleSec v3 container: XSalsa20, Twofish-CTR and AES-256-CTR layered,
//! authenticated by HMAC-SHA-512 and HMAC-Keccak-512.
//!
//! Layout:
//!
//! ```text
//! magic(4) | version(4) | salt(16) | hmac_sha512(64) | hmac_keccak512(64) | body
//! body = aes_iv(16) | AES( twofish_iv(16) | Twofish( nonce(24) | XSalsa20(plaintext) ) )
//! ```
//!
//! Both MACs cover `magic | version | salt | body` and are checked before any
//! layer is decrypted. The second MAC uses the original Keccak padding, not
//! FIPS 202 SHA3-512; v3 was fixed before the standard changed it.

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use hmac::{Hmac, Mac};
use salsa20::XSalsa20;
use sha2::Sha512;
use sha3::Keccak512;
use subtle::ConstantTimeEq;
use twofish::Twofish;
use zeroize::Zeroizing;

use super::kdf::{derive_keys, DerivedKeys, KdfParams};
use super::salt::{Salt, SALT_LENGTH};
use super::{Cipher, CipherProvider};
use crate::error::{Result, TripleSecError};

type Aes256Ctr = ctr::Ctr128BE<Aes256>;
type TwofishCtr = ctr::Ctr128BE<Twofish>;
type HmacSha512 = Hmac<Sha512>;
type HmacKeccak512 = Hmac<Keccak512>;

/// The four bytes prefixed to every container.
pub const MAGIC_BYTES: [u8; 4] = [0x1c, 0x94, 0xd7, 0xde];

/// The only container version this implementation reads or writes.
pub const VERSION: u32 = 3;

const HEADER_LENGTH: usize = 8;
const MAC_OUTPUT_LENGTH: usize = 64;
const AES_IV_LENGTH: usize = 16;
const TWOFISH_IV_LENGTH: usize = 16;
const XSALSA20_NONCE_LENGTH: usize = 24;

const SALT_OFFSET: usize = HEADER_LENGTH;
const MACS_OFFSET: usize = SALT_OFFSET + SALT_LENGTH;
const BODY_OFFSET: usize = MACS_OFFSET + 2 * MAC_OUTPUT_LENGTH;

/// Bytes added to the plaintext length by encryption.
pub const OVERHEAD: usize =
    BODY_OFFSET + AES_IV_LENGTH + TWOFISH_IV_LENGTH + XSALSA20_NONCE_LENGTH;

/// A cipher handle bound to one passphrase and (optionally) one salt.
///
/// Encryption always uses the salt given at construction. With no salt the
/// handle can only decrypt; each container's own header salt is used for that.
pub struct TripleSec {
    passphrase: Zeroizing<Vec<u8>>,
    params: KdfParams,
    salt: Option<Salt>,
    keys: Option<(Salt, DerivedKeys)>,
}

impl TripleSec {
    /// Build a handle with the standard v3 key-derivation cost.
    pub fn new(passphrase: &[u8], salt: Option<&[u8]>) -> Result<Self> {
        Self::with_params(passphrase, salt, KdfParams::default())
    }

    /// Build a handle with explicit scrypt parameters.
    pub fn with_params(passphrase: &[u8], salt: Option<&[u8]>, params: KdfParams) -> Result<Self> {
        if passphrase.is_empty() {
            return Err(TripleSecError::CipherConstruction(
                "Passphrase cannot be empty".to_string(),
            ));
        }

        let mut cipher = Self {
            passphrase: Zeroizing::new(passphrase.to_vec()),
            params,
            salt: None,
            keys: None,
        };

        if let Some(salt) = salt {
            let salt: [u8; SALT_LENGTH] = salt.try_into().map_err(|_| {
                TripleSecError::CipherConstruction(format!(
                    "Salt must be {} bytes (got {})",
                    SALT_LENGTH,
                    salt.len()
                ))
            })?;
            let salt = Salt::from_bytes(salt);
            cipher.keys_for(salt)?;
            cipher.salt = Some(salt);
        }

        Ok(cipher)
    }

    /// The salt this handle encrypts with, if it was given one.
    pub fn salt(&self) -> Option<&Salt> {
        self.salt.as_ref()
    }

    /// Derive (or reuse) the keys for `salt`.
    fn keys_for(&mut self, salt: Salt) -> Result<&DerivedKeys> {
        let cached = matches!(&self.keys, Some((current, _)) if *current == salt);
        if !cached {
            tracing::debug!(?salt, "deriving keys");
            let keys = derive_keys(&self.passphrase, salt.as_bytes(), self.params)?;
            self.keys = Some((salt, keys));
        }
        match &self.keys {
            Some((_, keys)) => Ok(keys),
            None => unreachable!("keys populated above"),
        }
    }
}

impl Cipher for TripleSec {
    fn encrypt(&mut self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let salt = self.salt.ok_or_else(|| {
            TripleSecError::CipherTransform("Encryption requires a salt".to_string())
        })?;
        let keys = self.keys_for(salt)?;

        let mut ivs = LayerIvs::default();
        for buf in [&mut ivs.nonce[..], &mut ivs.twofish[..], &mut ivs.aes[..]] {
            getrandom::getrandom(buf).map_err(|e| TripleSecError::Randomness(e.to_string()))?;
        }

        seal(keys, &salt, &ivs, plaintext)
    }

    fn decrypt(&mut self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.len() < OVERHEAD {
            return Err(TripleSecError::CipherTransform(format!(
                "Ciphertext too short ({} bytes, need at least {})",
                ciphertext.len(),
                OVERHEAD
            )));
        }

        let (header, rest) = ciphertext.split_at(HEADER_LENGTH);
        if header[..4] != MAGIC_BYTES {
            return Err(TripleSecError::CipherTransform(
                "Not a TripleSec container (bad magic bytes)".to_string(),
            ));
        }
        let version = u32::from_be_bytes([header[4], header[5], header[6], header[7]]);
        if version != VERSION {
            return Err(TripleSecError::CipherTransform(format!(
                "Unsupported TripleSec version {}",
                version
            )));
        }

        let mut salt = [0u8; SALT_LENGTH];
        salt.copy_from_slice(&rest[..SALT_LENGTH]);
        let keys = self.keys_for(Salt::from_bytes(salt))?;

        let sha512_tag = &ciphertext[MACS_OFFSET..MACS_OFFSET + MAC_OUTPUT_LENGTH];
        let keccak_tag = &ciphertext[MACS_OFFSET + MAC_OUTPUT_LENGTH..BODY_OFFSET];
        let body = &ciphertext[BODY_OFFSET..];

        let (expected_sha512, expected_keccak) =
            compute_macs(keys, &ciphertext[..MACS_OFFSET], body)?;
        let sha512_ok = expected_sha512.as_slice().ct_eq(sha512_tag);
        let keccak_ok = expected_keccak.as_slice().ct_eq(keccak_tag);
        if !bool::from(sha512_ok & keccak_ok) {
            return Err(TripleSecError::CipherTransform(
                "Authentication failed: wrong passphrase or corrupted file".to_string(),
            ));
        }

        let middle = open_layer::<Aes256Ctr>(keys.aes(), AES_IV_LENGTH, body)?;
        let inner = open_layer::<TwofishCtr>(keys.twofish(), TWOFISH_IV_LENGTH, &middle)?;
        open_layer::<XSalsa20>(keys.xsalsa20(), XSALSA20_NONCE_LENGTH, &inner)
    }
}

/// Per-container random IVs, innermost layer first.
#[derive(Default)]
struct LayerIvs {
    nonce: [u8; XSALSA20_NONCE_LENGTH],
    twofish: [u8; TWOFISH_IV_LENGTH],
    aes: [u8; AES_IV_LENGTH],
}

fn seal(keys: &DerivedKeys, salt: &Salt, ivs: &LayerIvs, plaintext: &[u8]) -> Result<Vec<u8>> {
    let inner = seal_layer::<XSalsa20>(keys.xsalsa20(), &ivs.nonce, plaintext)?;
    let middle = seal_layer::<TwofishCtr>(keys.twofish(), &ivs.twofish, &inner)?;
    let body = seal_layer::<Aes256Ctr>(keys.aes(), &ivs.aes, &middle)?;

    let mut out = Vec::with_capacity(BODY_OFFSET + body.len());
    out.extend_from_slice(&MAGIC_BYTES);
    out.extend_from_slice(&VERSION.to_be_bytes());
    out.extend_from_slice(salt.as_bytes());
    let (sha512_tag, keccak_tag) = compute_macs(keys, &out, &body)?;
    out.extend_from_slice(&sha512_tag);
    out.extend_from_slice(&keccak_tag);
    out.extend_from_slice(&body);
    Ok(out)
}

/// Returns `iv | C(data)`.
fn seal_layer<C>(key: &[u8], iv: &[u8], data: &[u8]) -> Result<Vec<u8>>
where
    C: KeyIvInit + StreamCipher,
{
    let mut cipher = C::new_from_slices(key, iv)
        .map_err(|e| TripleSecError::CipherTransform(format!("Cipher init failed: {}", e)))?;
    let mut out = Vec::with_capacity(iv.len() + data.len());
    out.extend_from_slice(iv);
    out.extend_from_slice(data);
    cipher.apply_keystream(&mut out[iv.len()..]);
    Ok(out)
}

/// Inverse of [`seal_layer`]: splits off the leading IV and decrypts the rest.
fn open_layer<C>(key: &[u8], iv_len: usize, sealed: &[u8]) -> Result<Vec<u8>>
where
    C: KeyIvInit + StreamCipher,
{
    if sealed.len() < iv_len {
        return Err(TripleSecError::CipherTransform(
            "Layer shorter than its IV".to_string(),
        ));
    }
    let (iv, data) = sealed.split_at(iv_len);
    let mut cipher = C::new_from_slices(key, iv)
        .map_err(|e| TripleSecError::CipherTransform(format!("Cipher init failed: {}", e)))?;
    let mut out = data.to_vec();
    cipher.apply_keystream(&mut out);
    Ok(out)
}

fn compute_macs(keys: &DerivedKeys, prefix: &[u8], body: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut sha512 = <HmacSha512 as Mac>::new_from_slice(keys.hmac_sha512())
        .map_err(|e| TripleSecError::CipherTransform(format!("MAC init failed: {}", e)))?;
    sha512.update(prefix);
    sha512.update(body);

    let mut keccak = <HmacKeccak512 as Mac>::new_from_slice(keys.hmac_keccak512())
        .map_err(|e| TripleSecError::CipherTransform(format!("MAC init failed: {}", e)))?;
    keccak.update(prefix);
    keccak.update(body);

    Ok((
        sha512.finalize().into_bytes().to_vec(),
        keccak.finalize().into_bytes().to_vec(),
    ))
}

/// Builds [`TripleSec`] handles with fixed key-derivation parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TripleSecProvider {
    params: KdfParams,
}

impl TripleSecProvider {
    pub fn new(params: KdfParams) -> Self {
        Self { params }
    }
}

impl CipherProvider for TripleSecProvider {
    type Cipher = TripleSec;

    fn new_cipher(&self, secret: &[u8], salt: Option<&[u8]>) -> Result<TripleSec> {
        TripleSec::with_params(secret, salt, self.params)
    }
}
