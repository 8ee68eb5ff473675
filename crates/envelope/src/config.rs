//! Explicit envelope parameters.

use serde::Deserialize;

use crate::envelope::frame::RESERVED;
use crate::error::EnvelopeError;
use crate::noise::{DEFAULT_CHARSET, DEFAULT_NOISE_LENGTH};

/// Parameters shared by the seal and open sides of an envelope.
///
/// Both sides must agree on `noise_length`; the charset only matters when
/// sealing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EnvelopeConfig {
    /// Number of noise characters prepended to the ciphertext.
    #[serde(default = "default_noise_length")]
    pub noise_length: usize,

    /// Characters noise is sampled from.
    #[serde(default = "default_charset")]
    pub charset: String,
}

fn default_noise_length() -> usize {
    DEFAULT_NOISE_LENGTH
}
fn default_charset() -> String {
    DEFAULT_CHARSET.into()
}

impl Default for EnvelopeConfig {
    fn default() -> Self {
        Self {
            noise_length: default_noise_length(),
            charset: default_charset(),
        }
    }
}

impl EnvelopeConfig {
    /// Return a copy with a different noise length.
    pub fn with_noise_length(mut self, noise_length: usize) -> Self {
        self.noise_length = noise_length;
        self
    }

    /// Return a copy with a different noise charset.
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Check that sealed envelopes will parse unambiguously.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::InvalidConfig`] if the charset is empty or
    /// contains a reserved framing character.
    pub fn validate(&self) -> Result<(), EnvelopeError> {
        if self.charset.is_empty() {
            return Err(EnvelopeError::InvalidConfig("noise charset must not be empty"));
        }
        if self.charset.contains(RESERVED) {
            return Err(EnvelopeError::InvalidConfig(
                "noise charset must not contain ':', '[' or ']'",
            ));
        }
        Ok(())
    }
}
