//! SHA-512 hashing and HMAC-SHA-512 tags, hex-encoded.

use hmac::{Hmac, Mac};
use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

type HmacSha512 = Hmac<Sha512>;

/// Character length of a hex-encoded SHA-512 digest or HMAC-SHA-512 tag.
pub const DIGEST_HEX_LEN: usize = 128;

/// Iterated SHA-512 of `text`, lowercase hex.
///
/// Each round after the first hashes the hex string produced by the previous
/// round, so `hash(x, n) == hash(&hash(x, n - 1), 1)`. Zero iterations return
/// the input unchanged.
pub fn hash(text: &str, iterations: u32) -> String {
    let mut current = text.to_owned();
    for _ in 0..iterations {
        current = hex::encode(Sha512::digest(current.as_bytes()));
    }
    current
}

/// HMAC-SHA-512 of `message` keyed with the UTF-8 bytes of `key`, lowercase hex.
pub fn hmac(message: &str, key: &str) -> String {
    let mut mac =
        HmacSha512::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Constant-time equality of two encoded tags.
///
/// Tags of different lengths never match.
pub fn tags_match(expected: &str, supplied: &str) -> bool {
    expected.as_bytes().ct_eq(supplied.as_bytes()).into()
}
