//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use common::ServiceError;
use envelope::{Envelope, EnvelopeConfig};

use crate::config::Config;

/// Application state shared across all request handlers.
///
/// Holds only defaults and limits; keys arrive with each request and are
/// never retained.
#[derive(Clone)]
pub struct AppState {
    /// Envelope parameters used when a request does not override them.
    pub envelope_config: Arc<EnvelopeConfig>,
    /// Largest per-request noise length accepted.
    pub max_noise_length: usize,
    /// PBKDF2 rounds used when a request does not specify them.
    pub kdf_iterations: u32,
    /// Largest per-request PBKDF2 round count accepted.
    pub max_kdf_iterations: u32,
}

impl AppState {
    /// Create a new [`AppState`] from the validated service configuration.
    pub fn new(cfg: &Config) -> Self {
        Self {
            envelope_config: Arc::new(cfg.envelope_config()),
            max_noise_length: cfg.max_noise_length,
            kdf_iterations: cfg.kdf_iterations,
            max_kdf_iterations: cfg.max_kdf_iterations,
        }
    }

    /// Build a codec for one request, applying an optional noise override.
    pub fn codec(&self, noise_length: Option<usize>) -> Result<Envelope, ServiceError> {
        let mut cfg = (*self.envelope_config).clone();
        if let Some(n) = noise_length {
            if n > self.max_noise_length {
                return Err(ServiceError::BadRequest(format!(
                    "noise_length must not exceed {}",
                    self.max_noise_length
                )));
            }
            cfg.noise_length = n;
        }
        Envelope::new(cfg).map_err(|e| ServiceError::Internal(e.to_string()))
    }

    /// Resolve the PBKDF2 round count for one request.
    pub fn kdf_iterations(&self, requested: Option<u32>) -> Result<u32, ServiceError> {
        let iterations = requested.unwrap_or(self.kdf_iterations);
        if iterations > self.max_kdf_iterations {
            return Err(ServiceError::BadRequest(format!(
                "iterations must not exceed {}",
                self.max_kdf_iterations
            )));
        }
        Ok(iterations)
    }
}

impl Default for AppState {
    /// Creates a default [`AppState`] from default configuration, suitable for tests.
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
