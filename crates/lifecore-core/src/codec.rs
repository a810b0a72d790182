//! Transport encoding for keys, nonces and ciphertexts
//!
//! Standard base64 alphabet with mandatory padding, matching libsodium's
//! `base64_variants.ORIGINAL`. Decoding is strict: characters outside the
//! alphabet, missing or extra padding, and non-canonical trailing bits are
//! all rejected.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::{RelayError, Result};

/// Encode bytes as standard padded base64
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard padded base64
pub fn decode(text: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(text)
        .map_err(|e| RelayError::InvalidEncoding(e.to_string()))
}

/// Decode base64 into a fixed-size array
pub fn decode_array<const N: usize>(text: &str) -> Result<[u8; N]> {
    let bytes = decode(text)?;
    bytes
        .as_slice()
        .try_into()
        .map_err(|_| RelayError::InvalidKeyLength {
            expected: N,
            actual: bytes.len(),
        })
}
