//! Common types, protocol definitions, and errors shared across `envelope-svc` crates.

pub mod error;
pub mod outcome;
pub mod protocol;

pub use error::ServiceError;
pub use outcome::{capture, capture_async, Outcome};
