//! Key and nonce types
//!
//! X25519 keys and XSalsa20 nonces as fixed-size newtypes. The secret key
//! never prints its bytes and is wiped from memory on drop.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::codec;
use crate::crypto::fill_random;
use crate::{RelayError, Result};

/// Size of an X25519 public key in bytes
pub const PUBLIC_KEY_LEN: usize = 32;

/// Size of an X25519 secret key in bytes
pub const SECRET_KEY_LEN: usize = 32;

/// Size of an XSalsa20 nonce in bytes
pub const NONCE_LEN: usize = 24;

/// Size of the Poly1305 authentication tag in bytes
pub const TAG_LEN: usize = 16;

fn to_array<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    bytes.try_into().map_err(|_| RelayError::InvalidKeyLength {
        expected: N,
        actual: bytes.len(),
    })
}

/// X25519 public key.
///
/// Only canonical encodings are accepted: the top bit of the last byte is
/// ignored by X25519, so a key with it set opens the same boxes as the key
/// without it. Derived keys never set it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_LEN]);

impl PublicKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::canonical(to_array(bytes)?)
    }

    pub fn from_base64(text: &str) -> Result<Self> {
        Self::canonical(codec::decode_array(text)?)
    }

    fn canonical(bytes: [u8; PUBLIC_KEY_LEN]) -> Result<Self> {
        if bytes[PUBLIC_KEY_LEN - 1] & 0x80 != 0 {
            return Err(RelayError::NonCanonicalKey);
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.0
    }

    pub fn to_base64(&self) -> String {
        codec::encode(self.0)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_base64())
    }
}

/// X25519 secret key
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey([u8; SECRET_KEY_LEN]);

impl SecretKey {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self(to_array(bytes)?))
    }

    pub fn from_base64(text: &str) -> Result<Self> {
        Ok(Self(codec::decode_array(text)?))
    }

    /// Raw key bytes. Only the box implementation should need these.
    pub fn expose_bytes(&self) -> &[u8; SECRET_KEY_LEN] {
        &self.0
    }

    /// Base64 form, for writing the key into configuration
    pub fn to_base64(&self) -> String {
        codec::encode(self.0)
    }

    /// Derive the matching public key
    pub fn public_key(&self) -> PublicKey {
        let secret = crypto_box::SecretKey::from(self.0);
        PublicKey(*secret.public_key().as_bytes())
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// XSalsa20 nonce
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    /// Fresh random nonce from the OS CSPRNG
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; NONCE_LEN];
        fill_random(&mut bytes)?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self(to_array(bytes)?))
    }

    pub fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Nonce({})", codec::encode(self.0))
    }
}

/// Key pair for public-key authenticated encryption
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub public_key: PublicKey,
    pub secret_key: SecretKey,
}

impl KeyPair {
    /// Generate a fresh X25519 key pair.
    ///
    /// Fails with [`RelayError::EntropyUnavailable`] if the OS random source
    /// cannot be read. There is no fallback source.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; SECRET_KEY_LEN];
        let filled = fill_random(&mut bytes);
        let secret_key = SecretKey(bytes);
        bytes.zeroize();
        filled?;

        Ok(Self::from_secret_key(secret_key))
    }

    /// Rebuild a key pair from a stored secret key
    pub fn from_secret_key(secret_key: SecretKey) -> Self {
        Self {
            public_key: secret_key.public_key(),
            secret_key,
        }
    }
}
