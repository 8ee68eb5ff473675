//! Axum middleware layers applied to the router.
//!
//! Includes request tracing, timeout enforcement, body-size limits, and
//! response compression.

use std::time::Duration;

/// Default per-request timeout applied to all routes.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Default maximum request body size (1 MiB).
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Limits enforced by the HTTP layer before a handler runs.
#[derive(Debug, Clone, Copy)]
pub struct HttpLimits {
    pub request_timeout: Duration,
    pub max_body_bytes: usize,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            request_timeout: REQUEST_TIMEOUT,
            max_body_bytes: MAX_BODY_BYTES,
        }
    }
}
