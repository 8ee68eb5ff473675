//! Sealing and opening of message and object envelopes.
//!
//! Sealing is encrypt-then-MAC:
//!
//! 1. generate noise, encrypt the plaintext (fresh IV per call);
//! 2. `payload = noise || ivHex || ciphertext`;
//! 3. frame the payload (with a bracketed context tag for messages);
//! 4. append `":" || HMAC(framed, key)`.
//!
//! Opening splits the envelope, recomputes the tag over the exact framed
//! bytes, and only decrypts after the tags match. A mismatch is
//! [`EnvelopeError::Integrity`] and the ciphertext is never touched.

pub mod frame;

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::config::EnvelopeConfig;
use crate::crypto::{tags_match, CryptoProvider, RustCrypto};
use crate::error::EnvelopeError;
use crate::noise;

/// Plaintext and context tag recovered from a message envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedMessage {
    /// The caller-supplied grouping label. Authenticated, never encrypted.
    pub context_tag: String,
    /// The decrypted message.
    pub plaintext: String,
}

/// Envelope codec bound to a validated configuration and a primitive provider.
///
/// Holds no keys and no mutable state; a single instance may be shared
/// freely across threads.
#[derive(Debug, Clone)]
pub struct Envelope<P = RustCrypto> {
    config: EnvelopeConfig,
    provider: P,
}

impl Envelope<RustCrypto> {
    /// Create a codec backed by [`RustCrypto`].
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidConfig`] if `config` fails validation.
    pub fn new(config: EnvelopeConfig) -> Result<Self, EnvelopeError> {
        Self::with_provider(config, RustCrypto)
    }
}

impl<P: CryptoProvider> Envelope<P> {
    /// Create a codec backed by a custom provider.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidConfig`] if `config` fails validation.
    pub fn with_provider(config: EnvelopeConfig, provider: P) -> Result<Self, EnvelopeError> {
        config.validate()?;
        Ok(Self { config, provider })
    }

    /// The configuration this codec was built with.
    pub fn config(&self) -> &EnvelopeConfig {
        &self.config
    }

    /// Seal a text message under `key`, labelled with `context_tag`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidContextTag`] if the tag contains `:`,
    /// `[` or `]`, and [`EnvelopeError::UnframeableField`] if the provider's
    /// ciphertext or tag contains `:`.
    pub fn seal_message(
        &self,
        plaintext: &str,
        key: &str,
        context_tag: &str,
    ) -> Result<String, EnvelopeError> {
        let payload = self.payload(plaintext, key)?;
        let framed = frame::frame_message(context_tag, &payload)?;
        let tag = self.tag(&framed, key)?;
        Ok(frame::append_tag(framed, &tag))
    }

    /// Open a message envelope and return only the plaintext.
    ///
    /// # Errors
    ///
    /// See [`Envelope::open_message_parts`].
    pub fn open_message(&self, envelope: &str, key: &str) -> Result<String, EnvelopeError> {
        self.open_message_parts(envelope, key).map(|m| m.plaintext)
    }

    /// Open a message envelope, returning the plaintext and its context tag.
    ///
    /// # Errors
    ///
    /// - [`EnvelopeError::MalformedEnvelope`] if the envelope does not split
    ///   into `[context]`, payload, and tag.
    /// - [`EnvelopeError::Integrity`] if the tag does not match.
    /// - [`EnvelopeError::Decryption`] if the verified ciphertext cannot be
    ///   decrypted under `key`.
    pub fn open_message_parts(
        &self,
        envelope: &str,
        key: &str,
    ) -> Result<OpenedMessage, EnvelopeError> {
        let fields = frame::split_message(envelope)?;
        self.verify(fields.authenticated, fields.tag, key)?;
        let plaintext = self.decrypt_payload(fields.payload, key)?;
        Ok(OpenedMessage {
            context_tag: fields.context_tag.to_owned(),
            plaintext,
        })
    }

    /// Serialise `value` to JSON and seal it as an object envelope.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Serialization`] if `value` cannot be
    /// represented as JSON, and [`EnvelopeError::UnframeableField`] if the
    /// provider's ciphertext or tag contains `:`.
    pub fn seal_object<T: Serialize + ?Sized>(
        &self,
        value: &T,
        key: &str,
    ) -> Result<String, EnvelopeError> {
        let json = serde_json::to_string(value)?;
        let payload = self.payload(&json, key)?;
        let tag = self.tag(&payload, key)?;
        Ok(frame::append_tag(payload, &tag))
    }

    /// Open an object envelope and deserialise its JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`Envelope::open_message_parts`], plus
    /// [`EnvelopeError::Serialization`] if the decrypted text is not valid
    /// JSON for `T`.
    pub fn open_object<T: DeserializeOwned>(
        &self,
        envelope: &str,
        key: &str,
    ) -> Result<T, EnvelopeError> {
        let fields = frame::split_object(envelope)?;
        self.verify(fields.payload, fields.tag, key)?;
        let json = self.decrypt_payload(fields.payload, key)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn payload(&self, plaintext: &str, key: &str) -> Result<String, EnvelopeError> {
        let ciphertext = self.provider.encrypt(plaintext, key);
        frame::ensure_unframed("ciphertext", &ciphertext)?;
        let mut payload = noise::generate(self.config.noise_length, &self.config.charset);
        payload.push_str(&ciphertext);
        Ok(payload)
    }

    fn tag(&self, authenticated: &str, key: &str) -> Result<String, EnvelopeError> {
        let tag = self.provider.hmac(authenticated, key);
        frame::ensure_unframed("tag", &tag)?;
        Ok(tag)
    }

    fn verify(&self, authenticated: &str, tag: &str, key: &str) -> Result<(), EnvelopeError> {
        let expected = self.provider.hmac(authenticated, key);
        if tags_match(&expected, tag) {
            Ok(())
        } else {
            debug!(
                authenticated_len = authenticated.len(),
                "envelope rejected: tag mismatch"
            );
            Err(EnvelopeError::Integrity)
        }
    }

    fn decrypt_payload(&self, payload: &str, key: &str) -> Result<String, EnvelopeError> {
        let ciphertext = frame::strip_noise(payload, self.config.noise_length)?;
        self.provider.decrypt(ciphertext, key).map_err(|e| {
            debug!(error = %e, "envelope rejected: decryption failed after tag verified");
            EnvelopeError::from(e)
        })
    }
}

/// Seal a message with the default provider.
///
/// # Errors
///
/// See [`Envelope::new`] and [`Envelope::seal_message`].
pub fn seal_message(
    plaintext: &str,
    key: &str,
    context_tag: &str,
    config: &EnvelopeConfig,
) -> Result<String, EnvelopeError> {
    Envelope::new(config.clone())?.seal_message(plaintext, key, context_tag)
}

/// Open a message with the default provider.
///
/// # Errors
///
/// See [`Envelope::open_message_parts`].
pub fn open_message(
    envelope: &str,
    key: &str,
    config: &EnvelopeConfig,
) -> Result<String, EnvelopeError> {
    Envelope::new(config.clone())?.open_message(envelope, key)
}

/// Seal a serialisable value with the default provider.
///
/// # Errors
///
/// See [`Envelope::seal_object`].
pub fn seal_object<T: Serialize + ?Sized>(
    value: &T,
    key: &str,
    config: &EnvelopeConfig,
) -> Result<String, EnvelopeError> {
    Envelope::new(config.clone())?.seal_object(value, key)
}

/// Open an object envelope with the default provider.
///
/// # Errors
///
/// See [`Envelope::open_object`].
pub fn open_object<T: DeserializeOwned>(
    envelope: &str,
    key: &str,
    config: &EnvelopeConfig,
) -> Result<T, EnvelopeError> {
    Envelope::new(config.clone())?.open_object(envelope, key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::provider::MockCryptoProvider;
    use crate::crypto::{cipher::IV_HEX_LEN, hmac, CipherError};
    use serde::Deserialize;
    use std::collections::BTreeMap;

    fn codec(noise_length: usize) -> Envelope {
        Envelope::new(EnvelopeConfig::default().with_noise_length(noise_length)).unwrap()
    }

    /// Replace the character at `index` with a different one from the same
    /// delimiter-free alphabet.
    fn flip_char(s: &str, index: usize) -> String {
        s.char_indices()
            .map(|(i, c)| {
                if i == index {
                    if c == 'A' { 'B' } else { 'A' }
                } else {
                    c
                }
            })
            .collect()
    }

    #[test]
    fn hello_example_matches_wire_format() {
        let codec = codec(5);
        let envelope = codec.seal_message("hello", "k", "room1").unwrap();

        let rest = envelope.strip_prefix("[room1]:").unwrap();
        let (payload, tag) = rest.split_once(':').unwrap();
        assert!(payload.len() > 5 + IV_HEX_LEN);
        assert!(payload[5..5 + IV_HEX_LEN].chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(tag.len(), 128);

        assert_eq!(codec.open_message(&envelope, "k").unwrap(), "hello");
    }

    #[test]
    fn round_trip_edge_plaintexts() {
        let codec = codec(15);
        for plaintext in ["", "a:b:c", "[]:", "日本語のテキスト 🦀", &"x".repeat(4096)] {
            let envelope = codec.seal_message(plaintext, "key", "").unwrap();
            assert_eq!(codec.open_message(&envelope, "key").unwrap(), plaintext);
        }
    }

    #[test]
    fn open_message_parts_returns_context_tag() {
        let codec = codec(15);
        let envelope = codec.seal_message("hi", "k", "clan-42").unwrap();
        let opened = codec.open_message_parts(&envelope, "k").unwrap();
        assert_eq!(
            opened,
            OpenedMessage {
                context_tag: "clan-42".into(),
                plaintext: "hi".into(),
            }
        );
    }

    #[test]
    fn zero_noise_length() {
        let codec = codec(0);
        let envelope = codec.seal_message("plain", "k", "").unwrap();
        let iv_hex = &envelope["[]:".len().."[]:".len() + IV_HEX_LEN];
        assert!(iv_hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(codec.open_message(&envelope, "k").unwrap(), "plain");
    }

    #[test]
    fn seals_are_not_deterministic() {
        let codec = codec(15);
        let a = codec.seal_message("same", "k", "t").unwrap();
        let b = codec.seal_message("same", "k", "t").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn seal_rejects_reserved_context_tag() {
        let err = codec(15).seal_message("x", "k", "a:b").unwrap_err();
        assert!(matches!(err, EnvelopeError::InvalidContextTag));
    }

    #[test]
    fn tampered_context_tag_fails_integrity() {
        let codec = codec(15);
        let envelope = codec.seal_message("x", "k", "roomA").unwrap();
        let forged = envelope.replacen("[roomA]", "[roomB]", 1);
        assert!(matches!(
            codec.open_message(&forged, "k"),
            Err(EnvelopeError::Integrity)
        ));
    }

    #[test]
    fn tampered_payload_or_tag_fails_integrity() {
        let codec = codec(15);
        let envelope = codec.seal_message("attack at dawn", "k", "r").unwrap();
        let payload_start = "[r]:".len();
        let tag_start = envelope.rfind(':').unwrap() + 1;

        for index in [payload_start, payload_start + 20, tag_start, envelope.len() - 1] {
            let forged = flip_char(&envelope, index);
            assert!(
                matches!(codec.open_message(&forged, "k"), Err(EnvelopeError::Integrity)),
                "flip at {index} was not detected"
            );
        }
    }

    #[test]
    fn wrong_key_is_rejected_before_decryption() {
        let codec = codec(15);
        let envelope = codec.seal_message("secret", "k1", "").unwrap();
        assert!(matches!(
            codec.open_message(&envelope, "k2"),
            Err(EnvelopeError::Integrity)
        ));
    }

    #[test]
    fn malformed_envelopes() {
        let codec = codec(15);
        for envelope in ["", "just text", "[x]:only-two", "[x]:a:b:c", "x:payload:tag"] {
            assert!(
                matches!(
                    codec.open_message(envelope, "k"),
                    Err(EnvelopeError::MalformedEnvelope(_))
                ),
                "{envelope:?}"
            );
        }
    }

    #[test]
    fn mismatched_noise_length_fails_decryption() {
        let envelope = codec(15).seal_message("hello", "k", "").unwrap();
        let err = codec(10).open_message(&envelope, "k").unwrap_err();
        assert!(matches!(err, EnvelopeError::Decryption(_)));
    }

    #[test]
    fn noise_longer_than_payload_is_malformed() {
        let codec = codec(3);
        let framed = "[]:ab".to_owned();
        let tag = hmac(&framed, "k");
        let envelope = format!("{framed}:{tag}");
        assert!(matches!(
            codec.open_message(&envelope, "k"),
            Err(EnvelopeError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn authentic_garbage_ciphertext_is_decryption_error() {
        let codec = codec(0);
        let framed = "[]:not-a-ciphertext".to_owned();
        let tag = hmac(&framed, "k");
        let envelope = format!("{framed}:{tag}");
        assert!(matches!(
            codec.open_message(&envelope, "k"),
            Err(EnvelopeError::Decryption(CipherError::InvalidFormat(_)))
        ));
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let cfg = EnvelopeConfig::default().with_charset("a:b");
        assert!(matches!(
            Envelope::new(cfg),
            Err(EnvelopeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn decrypt_is_never_called_when_tag_mismatches() {
        let mut provider = MockCryptoProvider::new();
        provider.expect_hmac().returning(|_, _| "0".repeat(128));
        provider.expect_decrypt().never();

        let codec = Envelope::with_provider(EnvelopeConfig::default(), provider).unwrap();
        let envelope = format!("[]:{}:{}", "n".repeat(40), "f".repeat(128));
        assert!(matches!(
            codec.open_message(&envelope, "k"),
            Err(EnvelopeError::Integrity)
        ));
    }

    #[test]
    fn provider_sees_exact_authenticated_bytes() {
        let mut provider = MockCryptoProvider::new();
        provider.expect_encrypt().returning(|_, _| "CIPHERTEXT".into());
        provider
            .expect_hmac()
            .withf(|message, key| {
                message.starts_with("[t]:") && message.ends_with("CIPHERTEXT") && key == "k"
            })
            .returning(|_, _| "tag".into());
        provider
            .expect_decrypt()
            .withf(|ciphertext, _| ciphertext == "CIPHERTEXT")
            .times(1)
            .returning(|_, _| Ok("plain".into()));

        let cfg = EnvelopeConfig::default().with_noise_length(4);
        let codec = Envelope::with_provider(cfg, provider).unwrap();
        let envelope = codec.seal_message("plain", "k", "t").unwrap();
        assert!(envelope.ends_with(":tag"));
        assert_eq!(codec.open_message(&envelope, "k").unwrap(), "plain");
    }

    #[test]
    fn seal_rejects_ciphertext_containing_delimiter() {
        let mut provider = MockCryptoProvider::new();
        provider
            .expect_encrypt()
            .returning(|plaintext, _| format!("iv:{plaintext}"));
        provider.expect_hmac().never();

        let codec = Envelope::with_provider(EnvelopeConfig::default(), provider).unwrap();
        assert!(matches!(
            codec.seal_message("hi", "k", ""),
            Err(EnvelopeError::UnframeableField("ciphertext"))
        ));
        assert!(matches!(
            codec.seal_object(&1, "k"),
            Err(EnvelopeError::UnframeableField("ciphertext"))
        ));
    }

    #[test]
    fn seal_rejects_tag_containing_delimiter() {
        let mut provider = MockCryptoProvider::new();
        provider.expect_encrypt().returning(|_, _| "CIPHERTEXT".into());
        provider.expect_hmac().returning(|_, _| "t:23".into());

        let codec = Envelope::with_provider(EnvelopeConfig::default(), provider).unwrap();
        assert!(matches!(
            codec.seal_message("hi", "k", "room"),
            Err(EnvelopeError::UnframeableField("tag"))
        ));
        assert!(matches!(
            codec.seal_object("v", "k"),
            Err(EnvelopeError::UnframeableField("tag"))
        ));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        age: u32,
        tags: Vec<String>,
        note: Option<String>,
    }

    #[test]
    fn object_round_trip() {
        let codec = codec(15);
        let profile = Profile {
            name: "Alice: the first".into(),
            age: 30,
            tags: vec!["a".into(), "[b]".into()],
            note: None,
        };
        let envelope = codec.seal_object(&profile, "k").unwrap();
        assert_eq!(envelope.matches(':').count(), 1);
        assert!(!envelope.starts_with('['));
        let opened: Profile = codec.open_object(&envelope, "k").unwrap();
        assert_eq!(opened, profile);
    }

    #[test]
    fn object_round_trip_dynamic_json() {
        let codec = codec(7);
        let value = serde_json::json!({"list": [1, 2.5, null, true], "nested": {"k": "v"}});
        let envelope = codec.seal_object(&value, "k").unwrap();
        let opened: serde_json::Value = codec.open_object(&envelope, "k").unwrap();
        assert_eq!(opened, value);
    }

    #[test]
    fn object_tamper_detected() {
        let codec = codec(15);
        let envelope = codec.seal_object(&vec![1, 2, 3], "k").unwrap();
        let forged = flip_char(&envelope, 3);
        assert!(matches!(
            codec.open_object::<Vec<i32>>(&forged, "k"),
            Err(EnvelopeError::Integrity)
        ));
    }

    #[test]
    fn object_wrong_shape_is_serialization_error() {
        let codec = codec(15);
        let envelope = codec.seal_object("just a string", "k").unwrap();
        assert!(matches!(
            codec.open_object::<Profile>(&envelope, "k"),
            Err(EnvelopeError::Serialization(_))
        ));
    }

    #[test]
    fn object_unserialisable_value() {
        let mut map = BTreeMap::new();
        map.insert(vec![1u8], "non-string key");
        assert!(matches!(
            codec(15).seal_object(&map, "k"),
            Err(EnvelopeError::Serialization(_))
        ));
    }

    #[test]
    fn object_envelope_is_not_a_message_envelope() {
        let codec = codec(15);
        let envelope = codec.seal_object(&1, "k").unwrap();
        assert!(matches!(
            codec.open_message(&envelope, "k"),
            Err(EnvelopeError::MalformedEnvelope(_))
        ));
    }

    #[test]
    fn free_functions_use_given_config() {
        let cfg = EnvelopeConfig::default().with_noise_length(3);
        let envelope = seal_message("hi", "k", "c", &cfg).unwrap();
        assert_eq!(open_message(&envelope, "k", &cfg).unwrap(), "hi");

        let sealed = seal_object(&[1, 2], "k", &cfg).unwrap();
        let opened: Vec<u8> = open_object(&sealed, "k", &cfg).unwrap();
        assert_eq!(opened, vec![1, 2]);
    }
}
