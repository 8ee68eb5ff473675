//! Common error types shared across crates.

use thiserror::Error;

/// Top-level service error type.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`ServiceError::BadRequest`] → 400
/// - [`ServiceError::IntegrityFailure`] → 422
/// - [`ServiceError::DecryptionFailure`] → 422
/// - [`ServiceError::Internal`] → 500
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request was malformed: invalid JSON, bad envelope layout, reserved
    /// characters in a context tag, or a body that does not deserialise.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The envelope's authentication tag did not verify.
    #[error("integrity check failed")]
    IntegrityFailure,

    /// The envelope verified but could not be decrypted.
    #[error("decryption failed: {0}")]
    DecryptionFailure(String),

    /// An unexpected internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            ServiceError::BadRequest(_) => 400,
            ServiceError::IntegrityFailure => 422,
            ServiceError::DecryptionFailure(_) => 422,
            ServiceError::Internal(_) => 500,
        }
    }

    /// Short machine-readable error code for the response body.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::BadRequest(_) => "bad_request",
            ServiceError::IntegrityFailure => "integrity_failure",
            ServiceError::DecryptionFailure(_) => "decryption_failure",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}
