//! HTTP functions.
//!
//! Each function accepts only POST and parses its own body, so a malformed
//! body is reported through the function's error response rather than an
//! extractor rejection.

mod admin;
mod reservations;

pub use admin::*;
pub use reservations::*;

use axum::body::Bytes;
use serde::de::DeserializeOwned;

use crate::errors::{AppError, FunctionError};

/// Response type for a function: JSON on success, a contextual error otherwise.
pub type FunctionResult<T> = Result<axum::Json<T>, FunctionError>;

/// Parse a raw request body as JSON.
pub fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    Ok(serde_json::from_slice(body)?)
}

/// Fallback for any verb other than POST.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// Commit timestamp, matching `Date.prototype.toISOString`.
pub(crate) fn commit_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
