//! The primitive set the envelope codec is built on.

use super::cipher::{self, CipherError};
use super::digest;

/// Symmetric encryption and MAC primitives consumed by [`crate::Envelope`].
///
/// Implementations must be stateless: every call is a pure function of its
/// arguments plus fresh randomness for the IV.
#[cfg_attr(test, mockall::automock)]
pub trait CryptoProvider {
    /// Encrypt `plaintext` under `key`, returning `<ivHex><ciphertext>`.
    ///
    /// The output alphabet must not contain the envelope delimiter `:`;
    /// sealing fails with [`crate::EnvelopeError::UnframeableField`] otherwise.
    fn encrypt(&self, plaintext: &str, key: &str) -> String;

    /// Invert [`CryptoProvider::encrypt`].
    fn decrypt(&self, ciphertext_with_iv: &str, key: &str) -> Result<String, CipherError>;

    /// Keyed tag over `message`; the output alphabet must not contain `:`.
    fn hmac(&self, message: &str, key: &str) -> String;
}

/// AES-256-CBC + HMAC-SHA-512 provider backed by the RustCrypto crates.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCrypto;

impl CryptoProvider for RustCrypto {
    fn encrypt(&self, plaintext: &str, key: &str) -> String {
        cipher::encrypt(plaintext, key)
    }

    fn decrypt(&self, ciphertext_with_iv: &str, key: &str) -> Result<String, CipherError> {
        cipher::decrypt(ciphertext_with_iv, key)
    }

    fn hmac(&self, message: &str, key: &str) -> String {
        digest::hmac(message, key)
    }
}
