//! Error taxonomy for sealing and opening envelopes.

use thiserror::Error;

use crate::crypto::CipherError;

/// Errors produced by the envelope codec.
///
/// Every failure is deterministic for a given input and is reported to the
/// caller as-is; nothing in this crate retries or recovers.
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The envelope does not have the expected field layout.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// The recomputed MAC does not match the tag carried by the envelope.
    #[error("integrity check failed")]
    Integrity,

    /// The tag verified but the ciphertext could not be decrypted.
    #[error("decryption failed: {0}")]
    Decryption(#[from] CipherError),

    /// The value could not be converted to or from JSON.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The context tag contains a reserved character.
    #[error("context tag must not contain ':', '[' or ']'")]
    InvalidContextTag,

    /// The provider produced a field containing the `:` delimiter, so the
    /// envelope could never be split again.
    #[error("provider output for the {0} contains the ':' delimiter")]
    UnframeableField(&'static str),

    /// The [`crate::EnvelopeConfig`] is unusable.
    #[error("invalid envelope configuration: {0}")]
    InvalidConfig(&'static str),
}

impl EnvelopeError {
    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            EnvelopeError::MalformedEnvelope(_) => "malformed_envelope",
            EnvelopeError::Integrity => "integrity",
            EnvelopeError::Decryption(_) => "decryption",
            EnvelopeError::Serialization(_) => "serialization",
            EnvelopeError::InvalidContextTag => "invalid_context_tag",
            EnvelopeError::UnframeableField(_) => "unframeable_field",
            EnvelopeError::InvalidConfig(_) => "invalid_config",
        }
    }
}
