//! Public-key authenticated encryption ("box")
//!
//! X25519 key agreement combined with XSalsa20-Poly1305, byte-compatible
//! with libsodium's `crypto_box_easy` / `crypto_box_open_easy`.

mod nacl;

pub use nacl::NaClBox;

use rand::{rngs::OsRng, RngCore};

use crate::keys::{Nonce, PublicKey, SecretKey};
use crate::{RelayError, Result};

/// Box cipher trait
///
/// Both directions derive the same shared secret: the sender combines its
/// secret key with the recipient's public key, the recipient combines its
/// secret key with the sender's public key.
pub trait BoxCipher: Send + Sync {
    /// Encrypt and authenticate `plaintext`. The output is the 16-byte tag
    /// followed by the ciphertext.
    ///
    /// Deterministic for identical inputs, so a nonce must never be reused
    /// with the same pair of keys.
    fn seal(
        &self,
        plaintext: &[u8],
        nonce: &Nonce,
        recipient_pk: &PublicKey,
        sender_sk: &SecretKey,
    ) -> Result<Vec<u8>>;

    /// Verify and decrypt `ciphertext`.
    ///
    /// Returns [`RelayError::AuthenticationFailed`] on any tag mismatch and
    /// [`RelayError::InvalidInputLength`] when the input is shorter than the tag.
    fn open(
        &self,
        ciphertext: &[u8],
        nonce: &Nonce,
        sender_pk: &PublicKey,
        recipient_sk: &SecretKey,
    ) -> Result<Vec<u8>>;
}

/// Fill `buf` from the OS CSPRNG
pub(crate) fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|_| RelayError::EntropyUnavailable)
}
