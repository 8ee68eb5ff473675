//! Configuration loading and validation for the envelope service.
//!
//! All values are read from environment variables at startup. The process will
//! exit with a clear error message if any variable is present but invalid.

use std::time::Duration;

use anyhow::{Context, Result};
use envelope::crypto::DEFAULT_KDF_ITERATIONS;
use envelope::noise::{DEFAULT_CHARSET, DEFAULT_NOISE_LENGTH};
use envelope::EnvelopeConfig;
use serde::Deserialize;

use crate::server::middleware::{HttpLimits, MAX_BODY_BYTES, REQUEST_TIMEOUT};

/// Validated envelope service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Noise length used when a request does not specify one.
    #[serde(default = "default_noise_length")]
    pub noise_length: usize,

    /// Largest noise length a request may ask for.
    #[serde(default = "default_max_noise_length")]
    pub max_noise_length: usize,

    /// Characters noise is sampled from.
    #[serde(default = "default_noise_charset")]
    pub noise_charset: String,

    /// PBKDF2 rounds used when a request does not specify them.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Largest PBKDF2 round count a request may ask for.
    #[serde(default = "default_max_kdf_iterations")]
    pub max_kdf_iterations: u32,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    8080
}
fn default_noise_length() -> usize {
    DEFAULT_NOISE_LENGTH
}
fn default_max_noise_length() -> usize {
    1024
}
fn default_noise_charset() -> String {
    DEFAULT_CHARSET.into()
}
fn default_kdf_iterations() -> u32 {
    DEFAULT_KDF_ITERATIONS
}
fn default_max_kdf_iterations() -> u32 {
    1_000_000
}
fn default_request_timeout() -> u64 {
    REQUEST_TIMEOUT.as_secs()
}
fn default_max_body_bytes() -> usize {
    MAX_BODY_BYTES
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            noise_length: default_noise_length(),
            max_noise_length: default_max_noise_length(),
            noise_charset: default_noise_charset(),
            kdf_iterations: default_kdf_iterations(),
            max_kdf_iterations: default_max_kdf_iterations(),
            request_timeout_secs: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// The envelope parameters requests fall back to.
    pub fn envelope_config(&self) -> EnvelopeConfig {
        EnvelopeConfig::default()
            .with_noise_length(self.noise_length)
            .with_charset(self.noise_charset.clone())
    }

    /// Body-size and timeout limits for the HTTP layer.
    pub fn http_limits(&self) -> HttpLimits {
        HttpLimits {
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            max_body_bytes: self.max_body_bytes,
        }
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        self.envelope_config()
            .validate()
            .context("NOISE_CHARSET is invalid")?;

        if self.noise_length > self.max_noise_length {
            anyhow::bail!("NOISE_LENGTH must not exceed MAX_NOISE_LENGTH");
        }
        if self.kdf_iterations > self.max_kdf_iterations {
            anyhow::bail!("KDF_ITERATIONS must not exceed MAX_KDF_ITERATIONS");
        }
        if self.request_timeout_secs == 0 {
            anyhow::bail!("REQUEST_TIMEOUT_SECS must be > 0");
        }
        if self.max_body_bytes == 0 {
            anyhow::bail!("MAX_BODY_BYTES must be > 0");
        }
        Ok(())
    }
}
