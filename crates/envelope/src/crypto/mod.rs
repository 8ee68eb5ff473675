//! Cryptographic primitives: hashing, HMAC, PBKDF2, and AES-256-CBC.
//!
//! This module knows nothing about envelopes. It provides the low-level
//! operations the codec in [`crate::envelope`] composes.
//!
//! # Encodings
//!
//! ```text
//! hash / hmac / derive_key / generate_salt   lowercase hex
//! encrypt                                    hex(iv[16]) || base64(ciphertext)
//! ```
//!
//! None of these alphabets contains the envelope delimiter `:`.

pub mod cipher;
pub mod digest;
pub mod kdf;
pub mod provider;

pub use cipher::{decrypt, encrypt, CipherError};
pub use digest::{hash, hmac, tags_match};
pub use kdf::{derive_key, generate_salt, DEFAULT_KDF_ITERATIONS};
pub use provider::{CryptoProvider, RustCrypto};
