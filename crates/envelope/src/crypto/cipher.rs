//! AES-256-CBC encryption and decryption of text payloads.
//!
//! **Algorithm choice:** AES-256 in CBC mode with PKCS7 padding. CBC provides
//! confidentiality only; integrity comes from the HMAC the envelope layer
//! computes over the ciphertext. Never hand the output of [`decrypt`] to a
//! caller unless the surrounding tag has already been verified.

use aes::Aes256;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use cbc::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use thiserror::Error;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of a CBC initialisation vector (16 bytes = 128 bits).
pub const IV_LEN: usize = 16;

/// Character length of the hex-encoded IV that prefixes every ciphertext.
pub const IV_HEX_LEN: usize = IV_LEN * 2;

/// AES block size in bytes.
const BLOCK_LEN: usize = 16;

/// Domain label mixed into the cipher key so it never equals the raw MAC key.
const CIPHER_KEY_LABEL: &[u8] = b"envelope.cipher.aes256cbc.v1:";

/// Errors produced by the cipher layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// The input does not match `<ivHex><base64 ciphertext>`.
    #[error("invalid ciphertext format: {0}")]
    InvalidFormat(&'static str),

    /// PKCS7 unpadding failed (wrong key or corrupted ciphertext).
    #[error("invalid padding")]
    InvalidPadding,

    /// The recovered plaintext is not valid UTF-8.
    #[error("decrypted bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// Encrypt `plaintext` under `key`.
///
/// A random 128-bit IV is generated per call via the OS CSPRNG. The result is
/// the hex-encoded IV immediately followed by the standard Base64 encoding of
/// the ciphertext.
pub fn encrypt(plaintext: &str, key: &str) -> String {
    let mut iv = [0u8; IV_LEN];
    OsRng.fill_bytes(&mut iv);

    let ciphertext = Aes256CbcEnc::new(&cipher_key(key).into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

    let mut out = hex::encode(iv);
    STANDARD.encode_string(ciphertext, &mut out);
    out
}

/// Decrypt a string produced by [`encrypt`].
///
/// # Errors
///
/// Returns [`CipherError::InvalidFormat`] if the IV or Base64 body cannot be
/// decoded, [`CipherError::InvalidPadding`] if the key is wrong or the
/// ciphertext was altered, and [`CipherError::InvalidUtf8`] if the recovered
/// bytes are not text.
pub fn decrypt(ciphertext_with_iv: &str, key: &str) -> Result<String, CipherError> {
    let (iv_hex, body) = split_iv(ciphertext_with_iv)?;

    let mut iv = [0u8; IV_LEN];
    hex::decode_to_slice(iv_hex, &mut iv)
        .map_err(|_| CipherError::InvalidFormat("IV is not hex"))?;

    let ciphertext = STANDARD
        .decode(body)
        .map_err(|_| CipherError::InvalidFormat("ciphertext is not base64"))?;
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_LEN != 0 {
        return Err(CipherError::InvalidFormat(
            "ciphertext is not a whole number of blocks",
        ));
    }

    let plaintext = Aes256CbcDec::new(&cipher_key(key).into(), &iv.into())
        .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
        .map_err(|_| CipherError::InvalidPadding)?;

    String::from_utf8(plaintext).map_err(|_| CipherError::InvalidUtf8)
}

fn split_iv(input: &str) -> Result<(&str, &str), CipherError> {
    if input.len() < IV_HEX_LEN || !input.is_char_boundary(IV_HEX_LEN) {
        return Err(CipherError::InvalidFormat("missing IV prefix"));
    }
    Ok(input.split_at(IV_HEX_LEN))
}

fn cipher_key(key: &str) -> [u8; KEY_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(CIPHER_KEY_LABEL);
    hasher.update(key.as_bytes());
    hasher.finalize().into()
}
