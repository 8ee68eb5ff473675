//! Random filler text prepended to ciphertext.
//!
//! Noise only blurs the relation between plaintext length and envelope
//! length. It is sampled from a non-cryptographic thread-local generator and
//! is **not** a nonce: the cipher draws its own IV from the OS CSPRNG.

use rand::{seq::SliceRandom, thread_rng};

/// Noise length used when the caller does not choose one.
pub const DEFAULT_NOISE_LENGTH: usize = 15;

/// Printable characters noise is drawn from by default.
///
/// Excludes the envelope delimiter `:` and the context-tag brackets.
pub const DEFAULT_CHARSET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!#$%&*+-=?@^_~";

/// Generate `length` characters sampled uniformly from `charset`.
///
/// An empty charset yields an empty string.
pub fn generate(length: usize, charset: &str) -> String {
    let alphabet: Vec<char> = charset.chars().collect();
    let mut rng = thread_rng();
    (0..length)
        .filter_map(|_| alphabet.choose(&mut rng).copied())
        .collect()
}
