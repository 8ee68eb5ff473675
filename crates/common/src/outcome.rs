//! Capture the result of a fallible call as a plain success/failure value.
//!
//! Useful at boundaries that must never propagate an error, such as
//! scripting bridges or batch jobs that report per-item status. Nothing in the
//! envelope codec relies on it.

use std::fmt::Display;
use std::future::Future;

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Result of a captured call.
///
/// Serialises as `{"success": true, "result": …}` or
/// `{"success": false, "message": …}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Failure(String),
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    /// Convert back into a `Result`, with the failure message as the error.
    pub fn into_result(self) -> Result<T, String> {
        match self {
            Outcome::Success(v) => Ok(v),
            Outcome::Failure(m) => Err(m),
        }
    }
}

impl<T, E: Display> From<Result<T, E>> for Outcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Outcome::Success(v),
            Err(e) => Outcome::Failure(e.to_string()),
        }
    }
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Outcome", 2)?;
        match self {
            Outcome::Success(v) => {
                s.serialize_field("success", &true)?;
                s.serialize_field("result", v)?;
            }
            Outcome::Failure(m) => {
                s.serialize_field("success", &false)?;
                s.serialize_field("message", m)?;
            }
        }
        s.end()
    }
}

/// Run `f` and capture its result.
pub fn capture<T, E, F>(f: F) -> Outcome<T>
where
    E: Display,
    F: FnOnce() -> Result<T, E>,
{
    f().into()
}

/// Await `fut` and capture its result.
pub async fn capture_async<T, E, Fut>(fut: Fut) -> Outcome<T>
where
    E: Display,
    Fut: Future<Output = Result<T, E>>,
{
    fut.await.into()
}
