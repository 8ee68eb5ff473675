//! PBKDF2 key derivation and random salt generation.

use pbkdf2::pbkdf2_hmac;
use rand::{rngs::OsRng, RngCore};
use sha2::Sha512;

/// Default PBKDF2 iteration count.
pub const DEFAULT_KDF_ITERATIONS: u32 = 10_000;

/// Derived key length in bytes (512 bits).
pub const DERIVED_KEY_LEN: usize = 64;

/// Salt length in bytes.
pub const SALT_LEN: usize = 32;

/// Derive a 512-bit key from `secret` and `salt` with PBKDF2-HMAC-SHA-512.
///
/// Returns the key as lowercase hex. The iteration count is a pure cost
/// parameter: no minimum is enforced, and zero runs a single round.
pub fn derive_key(secret: &str, salt: &str, iterations: u32) -> String {
    let mut out = [0u8; DERIVED_KEY_LEN];
    pbkdf2_hmac::<Sha512>(
        secret.as_bytes(),
        salt.as_bytes(),
        iterations.max(1),
        &mut out,
    );
    hex::encode(out)
}

/// Generate a fresh random salt from the OS CSPRNG, lowercase hex.
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    hex::encode(salt)
}
