//! Short human-comparable renderings of a hex hash.
//!
//! Each output symbol is chosen by one byte of the hash, so two parties can
//! read a fingerprint aloud and compare. Pure presentation: these carry far
//! less entropy than the hash itself.

use thiserror::Error;

use crate::noise::DEFAULT_CHARSET;

/// Default number of symbols in a visual fingerprint.
pub const DEFAULT_VISUAL_COUNT: usize = 4;

/// Default number of symbols in a character fingerprint.
pub const DEFAULT_CHAR_COUNT: usize = 16;

/// Symbols for [`visual`].
pub const EMOJI: [&str; 64] = [
    "🐶", "🐱", "🦊", "🐻", "🐼", "🐨", "🐯", "🦁", "🐮", "🐷", "🐸", "🐵", "🐔", "🐧", "🐦", "🦆",
    "🦉", "🐺", "🐗", "🐴", "🦄", "🐝", "🐛", "🦋", "🐌", "🐞", "🐢", "🐍", "🦎", "🐙", "🦑", "🦀",
    "🐡", "🐠", "🐬", "🐳", "🦈", "🐊", "🐘", "🦒", "🌵", "🌲", "🌻", "🍄", "🌙", "⭐", "🔥", "🌈",
    "🍎", "🍋", "🍉", "🍇", "🍓", "🍒", "🥑", "🥕", "🚀", "⚓", "🎈", "🎲", "🔑", "🔔", "💎", "🎸",
];

/// Errors produced while rendering a fingerprint.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FingerprintError {
    /// A byte pair in the input is not hexadecimal.
    #[error("hash is not valid hex at byte pair {0}")]
    InvalidHex(usize),
}

/// Render the first `count` bytes of `hash_hex` as emoji.
///
/// A hash shorter than `count` bytes yields a shorter fingerprint.
///
/// # Errors
///
/// Returns [`FingerprintError::InvalidHex`] if a consumed byte pair is not hex.
pub fn visual(hash_hex: &str, count: usize) -> Result<String, FingerprintError> {
    Ok(hash_bytes(hash_hex, count)?
        .map(|b| EMOJI[usize::from(b) % EMOJI.len()])
        .collect())
}

/// Render the first `count` bytes of `hash_hex` as characters from the
/// default noise charset.
///
/// # Errors
///
/// Returns [`FingerprintError::InvalidHex`] if a consumed byte pair is not hex.
pub fn chars(hash_hex: &str, count: usize) -> Result<String, FingerprintError> {
    let alphabet: Vec<char> = DEFAULT_CHARSET.chars().collect();
    Ok(hash_bytes(hash_hex, count)?
        .map(|b| alphabet[usize::from(b) % alphabet.len()])
        .collect())
}

fn hash_bytes(
    hash_hex: &str,
    count: usize,
) -> Result<impl Iterator<Item = u8>, FingerprintError> {
    let bytes = hash_hex
        .as_bytes()
        .chunks_exact(2)
        .take(count)
        .enumerate()
        .map(|(i, pair)| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
                .ok_or(FingerprintError::InvalidHex(i))
        })
        .collect::<Result<Vec<u8>, _>>()?;
    Ok(bytes.into_iter())
}
