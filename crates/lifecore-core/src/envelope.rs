//! Message envelope
//!
//! Wire layout: `message` is base64(nonce ‖ ciphertext) with the 24-byte
//! nonce first, `sender_pk` is the base64 public key of the sealing key
//! pair. Envelopes are only built through [`Envelope::build`] or
//! [`Envelope::build_with_sender`], both of which draw a fresh nonce.

use lifecore_types::WireEnvelope;

use crate::codec;
use crate::crypto::{BoxCipher, NaClBox};
use crate::keys::{KeyPair, Nonce, PublicKey, SecretKey, NONCE_LEN, TAG_LEN};
use crate::{RelayError, Result};

/// Shortest decoded payload that can hold a nonce and a tag
pub const MIN_PAYLOAD_LEN: usize = NONCE_LEN + TAG_LEN;

/// A sealed message with everything the recipient needs to open it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    nonce: Nonce,
    ciphertext: Vec<u8>,
    sender_pk: PublicKey,
}

impl Envelope {
    /// Seal `plaintext` for `recipient_pk` with a one-off sender key pair.
    ///
    /// The ephemeral secret key is dropped (and wiped) before returning.
    pub fn build(plaintext: &[u8], recipient_pk: &PublicKey) -> Result<Self> {
        let ephemeral = KeyPair::generate()?;
        Self::build_with_sender(plaintext, recipient_pk, &ephemeral)
    }

    /// Seal `plaintext` for `recipient_pk` as `sender`
    pub fn build_with_sender(
        plaintext: &[u8],
        recipient_pk: &PublicKey,
        sender: &KeyPair,
    ) -> Result<Self> {
        let nonce = Nonce::generate()?;
        let ciphertext = NaClBox.seal(plaintext, &nonce, recipient_pk, &sender.secret_key)?;

        Ok(Self {
            nonce,
            ciphertext,
            sender_pk: sender.public_key,
        })
    }

    pub fn nonce(&self) -> &Nonce {
        &self.nonce
    }

    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    pub fn sender_public_key(&self) -> &PublicKey {
        &self.sender_pk
    }

    /// nonce ‖ ciphertext
    pub fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(NONCE_LEN + self.ciphertext.len());
        payload.extend_from_slice(self.nonce.as_bytes());
        payload.extend_from_slice(&self.ciphertext);
        payload
    }

    pub fn to_wire(&self) -> WireEnvelope {
        WireEnvelope {
            message: codec::encode(self.payload()),
            sender_pk: self.sender_pk.to_base64(),
        }
    }

    /// Decode a wire envelope without opening it
    pub fn parse(wire: &WireEnvelope) -> Result<Self> {
        if wire.message.is_empty() || wire.sender_pk.is_empty() {
            return Err(RelayError::MalformedEnvelope("missing fields".to_string()));
        }

        let payload = codec::decode(&wire.message)
            .map_err(|_| RelayError::MalformedEnvelope("message is not valid base64".to_string()))?;

        // A set top bit is a bit-flipped key, not a malformed one
        let sender_pk = PublicKey::from_base64(&wire.sender_pk).map_err(|e| match e {
            RelayError::NonCanonicalKey => RelayError::AuthenticationFailed,
            _ => RelayError::MalformedEnvelope("sender_pk is not a valid public key".to_string()),
        })?;

        if payload.len() < MIN_PAYLOAD_LEN {
            return Err(RelayError::InvalidInputLength {
                expected: MIN_PAYLOAD_LEN,
                actual: payload.len(),
            });
        }

        let (nonce_bytes, ciphertext) = payload.split_at(NONCE_LEN);

        Ok(Self {
            nonce: Nonce::from_bytes(nonce_bytes)?,
            ciphertext: ciphertext.to_vec(),
            sender_pk,
        })
    }

    /// Verify and decrypt with the recipient's secret key
    pub fn open(&self, recipient_sk: &SecretKey) -> Result<Vec<u8>> {
        NaClBox.open(&self.ciphertext, &self.nonce, &self.sender_pk, recipient_sk)
    }
}

/// Parse and open a wire envelope in one step
pub fn open(wire: &WireEnvelope, recipient_sk: &SecretKey) -> Result<Vec<u8>> {
    Envelope::parse(wire)?.open(recipient_sk)
}
