//! Noise-padded, encrypt-then-MAC envelopes for short text messages and
//! serialisable objects.
//!
//! # Wire format
//!
//! ```text
//! message: "[" <context> "]:" <noise><ivHex><base64 ciphertext> ":" <hmac hex>
//! object:  <noise><ivHex><base64 ciphertext> ":" <hmac hex>
//! ```
//!
//! The HMAC-SHA-512 tag covers everything before the final `:` and is checked
//! before any decryption is attempted. Noise is plain filler, not a nonce.
//!
//! ```
//! use envelope::{Envelope, EnvelopeConfig};
//!
//! let codec = Envelope::new(EnvelopeConfig::default()).unwrap();
//! let sealed = codec.seal_message("hello", "k", "room1").unwrap();
//! assert!(sealed.starts_with("[room1]:"));
//! assert_eq!(codec.open_message(&sealed, "k").unwrap(), "hello");
//! ```
//!
//! Every operation is a pure function of its inputs plus fresh randomness.
//! Nothing here stores, generates, or rotates keys.

pub mod config;
pub mod crypto;
pub mod envelope;
pub mod error;
pub mod fingerprint;
pub mod noise;

#[cfg(test)]
mod proptests;

pub use config::EnvelopeConfig;
pub use envelope::{open_message, open_object, seal_message, seal_object, Envelope, OpenedMessage};
pub use error::EnvelopeError;
