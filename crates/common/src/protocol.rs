//! Request and response types exchanged with `envelope-svc`.
//!
//! All bodies are JSON. Optional fields fall back to the service's configured
//! defaults when omitted.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Message envelopes
// ---------------------------------------------------------------------------

/// Request body for `POST /v1/message/seal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealMessageRequest {
    /// Text to encrypt.
    pub plaintext: String,
    /// Shared secret used for both encryption and the MAC.
    pub key: String,
    /// Grouping label embedded unencrypted (but authenticated) in the envelope.
    #[serde(default)]
    pub context_tag: String,
    /// Overrides the configured noise length.
    #[serde(default)]
    pub noise_length: Option<usize>,
}

/// Request body for `POST /v1/message/open` and `POST /v1/object/open`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRequest {
    /// The sealed envelope string.
    pub envelope: String,
    /// Shared secret the envelope was sealed with.
    pub key: String,
    /// Must equal the noise length used when sealing.
    #[serde(default)]
    pub noise_length: Option<usize>,
}

/// Response body for both seal endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealResponse {
    /// The opaque envelope string.
    pub envelope: String,
}

/// Response body for `POST /v1/message/open`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenMessageResponse {
    /// Decrypted message.
    pub plaintext: String,
    /// Authenticated context tag carried by the envelope.
    pub context_tag: String,
}

// ---------------------------------------------------------------------------
// Object envelopes
// ---------------------------------------------------------------------------

/// Request body for `POST /v1/object/seal`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealObjectRequest {
    /// Arbitrary JSON value to seal.
    pub value: serde_json::Value,
    /// Shared secret used for both encryption and the MAC.
    pub key: String,
    /// Overrides the configured noise length.
    #[serde(default)]
    pub noise_length: Option<usize>,
}

/// Response body for `POST /v1/object/open`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenObjectResponse {
    /// The recovered JSON value.
    pub value: serde_json::Value,
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// Request body for `POST /v1/hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashRequest {
    pub text: String,
    /// Number of SHA-512 rounds (default 1).
    #[serde(default)]
    pub iterations: Option<u32>,
}

/// Response body for `POST /v1/hash`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashResponse {
    pub hash: String,
}

/// Request body for `POST /v1/hmac`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HmacRequest {
    pub text: String,
    pub key: String,
}

/// Response body for `POST /v1/hmac`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HmacResponse {
    pub tag: String,
}

/// Request body for `POST /v1/derive-key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveKeyRequest {
    pub secret: String,
    pub salt: String,
    /// PBKDF2 rounds; overrides the configured default.
    #[serde(default)]
    pub iterations: Option<u32>,
}

/// Response body for `POST /v1/derive-key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveKeyResponse {
    /// 512-bit derived key, lowercase hex.
    pub key: String,
}

/// Response body for `POST /v1/salt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaltResponse {
    pub salt: String,
}

/// Request body for `POST /v1/fingerprint`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintRequest {
    /// Hex-encoded hash to render.
    pub hash: String,
    #[serde(default)]
    pub visual_count: Option<usize>,
    #[serde(default)]
    pub char_count: Option<usize>,
}

/// Response body for `POST /v1/fingerprint`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintResponse {
    /// Emoji rendering.
    pub visual: String,
    /// Character rendering.
    pub chars: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"integrity_failure"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving.
    pub status: String,
    /// Crate version of the running service.
    pub version: String,
}
