//! NaCl crypto_box implementation (XSalsa20Poly1305)

use super::BoxCipher;
use crate::keys::{Nonce, PublicKey, SecretKey, TAG_LEN};
use crate::{RelayError, Result};
use crypto_box::{aead::Aead, SalsaBox};

/// NaCl box cipher
#[derive(Debug, Clone, Copy, Default)]
pub struct NaClBox;

impl NaClBox {
    pub fn new() -> Self {
        Self
    }
}

impl BoxCipher for NaClBox {
    fn seal(
        &self,
        plaintext: &[u8],
        nonce: &Nonce,
        recipient_pk: &PublicKey,
        sender_sk: &SecretKey,
    ) -> Result<Vec<u8>> {
        let recipient_pk = crypto_box::PublicKey::from(*recipient_pk.as_bytes());
        let sender_sk = crypto_box::SecretKey::from(*sender_sk.expose_bytes());

        let salsa_box = SalsaBox::new(&recipient_pk, &sender_sk);
        let nonce = xsalsa20poly1305::Nonce::from_slice(nonce.as_bytes());

        salsa_box
            .encrypt(nonce, plaintext)
            .map_err(|_| RelayError::Encryption("Encryption failed".to_string()))
    }

    fn open(
        &self,
        ciphertext: &[u8],
        nonce: &Nonce,
        sender_pk: &PublicKey,
        recipient_sk: &SecretKey,
    ) -> Result<Vec<u8>> {
        if ciphertext.len() < TAG_LEN {
            return Err(RelayError::InvalidInputLength {
                expected: TAG_LEN,
                actual: ciphertext.len(),
            });
        }

        let sender_pk = crypto_box::PublicKey::from(*sender_pk.as_bytes());
        let recipient_sk = crypto_box::SecretKey::from(*recipient_sk.expose_bytes());

        let salsa_box = SalsaBox::new(&sender_pk, &recipient_sk);
        let nonce = xsalsa20poly1305::Nonce::from_slice(nonce.as_bytes());

        salsa_box
            .decrypt(nonce, ciphertext)
            .map_err(|_| RelayError::AuthenticationFailed)
    }
}
