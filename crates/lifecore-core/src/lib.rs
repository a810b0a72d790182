//! LifeCore Core Library
//!
//! Public-key authenticated encryption for the relay: key generation, the
//! base64 codec, the XSalsa20-Poly1305 box, and the message envelope that
//! binds nonce, ciphertext and sender key together.

// Re-export wire types from lifecore-types
pub use lifecore_types::*;

pub mod codec;
#[cfg(feature = "crypto")]
pub mod crypto;
#[cfg(feature = "crypto")]
pub mod envelope;
pub mod error;
#[cfg(feature = "crypto")]
pub mod keys;
pub mod ports;

#[cfg(all(test, feature = "crypto"))]
mod proptests;

#[cfg(feature = "crypto")]
pub use crypto::{BoxCipher, NaClBox};
#[cfg(feature = "crypto")]
pub use envelope::Envelope;
pub use error::{RelayError, Result};
#[cfg(feature = "crypto")]
pub use keys::{KeyPair, Nonce, PublicKey, SecretKey};
