//! Property-based tests for the box, codec and envelope.

use proptest::prelude::*;

use crate::codec;
use crate::envelope::{self, Envelope};
use crate::keys::{KeyPair, Nonce, NONCE_LEN, TAG_LEN};
use crate::{BoxCipher, NaClBox, RelayError, WireEnvelope};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Sealing then opening returns the original plaintext, empty included.
    #[test]
    fn seal_open_roundtrip(plaintext in prop::collection::vec(any::<u8>(), 0..2048)) {
        let alice = KeyPair::generate().unwrap();
        let bob = KeyPair::generate().unwrap();
        let nonce = Nonce::generate().unwrap();

        let ciphertext = NaClBox.seal(&plaintext, &nonce, &bob.public_key, &alice.secret_key).unwrap();
        prop_assert_eq!(ciphertext.len(), plaintext.len() + TAG_LEN);

        let decrypted = NaClBox.open(&ciphertext, &nonce, &alice.public_key, &bob.secret_key).unwrap();
        prop_assert_eq!(decrypted, plaintext);
    }

    /// Any nonce bytes work, not just generated ones.
    #[test]
    fn seal_open_arbitrary_nonce(
        nonce_bytes in prop::array::uniform24(any::<u8>()),
        plaintext in prop::collection::vec(any::<u8>(), 0..512),
    ) {
        let alice = KeyPair::generate().unwrap();
        let bob = KeyPair::generate().unwrap();
        let nonce = Nonce::from_bytes(&nonce_bytes).unwrap();

        let ciphertext = NaClBox.seal(&plaintext, &nonce, &bob.public_key, &alice.secret_key).unwrap();
        let decrypted = NaClBox.open(&ciphertext, &nonce, &alice.public_key, &bob.secret_key).unwrap();
        prop_assert_eq!(decrypted, plaintext);
    }

    /// Flipping any single ciphertext bit is always rejected.
    #[test]
    fn single_bit_flip_rejected(
        plaintext in prop::collection::vec(any::<u8>(), 0..256),
        bit_seed in any::<usize>(),
    ) {
        let alice = KeyPair::generate().unwrap();
        let bob = KeyPair::generate().unwrap();
        let nonce = Nonce::generate().unwrap();

        let mut ciphertext = NaClBox.seal(&plaintext, &nonce, &bob.public_key, &alice.secret_key).unwrap();
        let bit = bit_seed % (ciphertext.len() * 8);
        ciphertext[bit / 8] ^= 1 << (bit % 8);

        let result = NaClBox.open(&ciphertext, &nonce, &alice.public_key, &bob.secret_key);
        prop_assert!(matches!(result, Err(RelayError::AuthenticationFailed)));
    }

    /// Codec round trip for arbitrary bytes, up to well past a full ciphertext.
    #[test]
    fn codec_roundtrip(bytes in prop::collection::vec(any::<u8>(), 0..4096)) {
        let encoded = codec::encode(&bytes);
        prop_assert!(encoded.len() % 4 == 0);
        prop_assert_eq!(codec::decode(&encoded).unwrap(), bytes);
    }

    /// Arbitrary text never panics the decoder.
    #[test]
    fn codec_decode_never_panics(text in ".*") {
        let _ = codec::decode(&text);
    }

    /// Envelope round trip through the wire form.
    #[test]
    fn envelope_roundtrip(plaintext in prop::collection::vec(any::<u8>(), 0..1024)) {
        let server = KeyPair::generate().unwrap();
        let wire = Envelope::build(&plaintext, &server.public_key).unwrap().to_wire();

        let decrypted = envelope::open(&wire, &server.secret_key).unwrap();
        prop_assert_eq!(decrypted, plaintext);
    }

    /// Arbitrary payloads fail cleanly instead of panicking.
    #[test]
    fn envelope_arbitrary_payload_fails_closed(payload in prop::collection::vec(any::<u8>(), 0..128)) {
        let server = KeyPair::generate().unwrap();
        let wire = WireEnvelope {
            message: codec::encode(&payload),
            sender_pk: KeyPair::generate().unwrap().public_key.to_base64(),
        };

        let result = envelope::open(&wire, &server.secret_key);
        prop_assert!(result.is_err());
        if payload.len() >= NONCE_LEN + TAG_LEN {
            prop_assert!(matches!(result, Err(RelayError::AuthenticationFailed)));
        }
    }
}
