//! Structured logging setup.
//!
//! # Telemetry invariants
//!
//! - **No keys, plaintexts, or envelopes** may appear in any span attribute or
//!   log field. Log error kinds and lengths only.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).

pub mod init;

pub use init::init_telemetry;
