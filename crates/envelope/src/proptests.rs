//! Property-based tests for the envelope codec and primitives.
//!
//! - Sealed messages and objects open back to the exact input
//! - Any single-character change to a sealed message is rejected
//! - A different key never recovers the plaintext
//! - Hashing and key derivation are deterministic

use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::crypto::{derive_key, hash, hmac};
use crate::{Envelope, EnvelopeConfig, EnvelopeError};

fn codec(noise_length: usize) -> Envelope {
    Envelope::new(EnvelopeConfig::default().with_noise_length(noise_length)).unwrap()
}

// ==================== Round-trip Property Tests ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any text, including the delimiter and multi-byte characters, survives
    /// a seal/open cycle.
    #[test]
    fn message_round_trip(
        plaintext in ".{0,200}",
        key in ".{0,32}",
        context in "[a-zA-Z0-9_-]{0,16}",
        noise_length in 0usize..40,
    ) {
        let codec = codec(noise_length);
        let envelope = codec.seal_message(&plaintext, &key, &context).unwrap();
        let opened = codec.open_message_parts(&envelope, &key).unwrap();
        prop_assert_eq!(opened.plaintext, plaintext);
        prop_assert_eq!(opened.context_tag, context);
    }

    /// Sealed messages always have exactly three delimiter-separated fields.
    #[test]
    fn message_has_three_fields(plaintext in ".{0,64}", noise_length in 0usize..20) {
        let envelope = codec(noise_length).seal_message(&plaintext, "k", "").unwrap();
        prop_assert_eq!(envelope.matches(':').count(), 2);
    }

    /// Arbitrary JSON-representable structures survive a seal/open cycle.
    #[test]
    fn object_round_trip(
        value in prop::collection::btree_map(".{0,8}", prop::collection::vec(any::<i64>(), 0..5), 0..6),
    ) {
        let codec = codec(15);
        let envelope = codec.seal_object(&value, "key").unwrap();
        let opened: BTreeMap<String, Vec<i64>> = codec.open_object(&envelope, "key").unwrap();
        prop_assert_eq!(opened, value);
    }
}

// ==================== Tamper Property Tests ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Replacing any one character of the payload or tag with a different
    /// non-delimiter character is an integrity failure.
    #[test]
    fn single_char_tamper_detected(
        plaintext in ".{1,64}",
        position in any::<prop::sample::Index>(),
        replacement in "[A-Za-z0-9+/=]",
    ) {
        let codec = codec(15);
        let envelope = codec.seal_message(&plaintext, "k", "room").unwrap();
        let body_start = "[room]:".len();
        let body: Vec<char> = envelope[body_start..].chars().collect();

        let index = position.index(body.len());
        let replacement = replacement.chars().next().unwrap();
        prop_assume!(body[index] != ':' && body[index] != replacement);

        let mut forged: String = envelope[..body_start].to_owned();
        for (i, c) in body.iter().enumerate() {
            forged.push(if i == index { replacement } else { *c });
        }

        let result = codec.open_message(&forged, "k");
        prop_assert!(matches!(result, Err(EnvelopeError::Integrity)));
    }

    /// Opening with a different key never yields the plaintext.
    #[test]
    fn wrong_key_rejected(plaintext in ".{0,64}", k1 in ".{1,16}", k2 in ".{1,16}") {
        prop_assume!(k1 != k2);
        let codec = codec(15);
        let envelope = codec.seal_message(&plaintext, &k1, "").unwrap();
        let result = codec.open_message(&envelope, &k2);
        prop_assert!(matches!(
            result,
            Err(EnvelopeError::Integrity) | Err(EnvelopeError::Decryption(_))
        ));
    }
}

// ==================== Determinism Property Tests ====================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// `hash(x, n)` equals one more round over `hash(x, n - 1)`.
    #[test]
    fn hash_iteration_chains(text in ".{0,64}", n in 2u32..6) {
        prop_assert_eq!(hash(&text, n), hash(&hash(&text, n - 1), 1));
    }

    /// HMAC and PBKDF2 are pure functions of their inputs.
    #[test]
    fn keyed_primitives_deterministic(text in ".{0,64}", key in ".{0,16}") {
        prop_assert_eq!(hmac(&text, &key), hmac(&text, &key));
        prop_assert_eq!(derive_key(&key, &text, 2), derive_key(&key, &text, 2));
    }
}
