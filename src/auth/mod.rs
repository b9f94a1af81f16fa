//! Admin password checks.
//!
//! Implements constant-time comparison to mitigate timing attacks.

use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Check a submitted admin password against the configured secret.
///
/// With no secret configured every password is rejected.
pub fn verify_admin_password(expected: Option<&str>, provided: Option<&str>) -> Result<(), AppError> {
    match (expected, provided) {
        (Some(expected), Some(provided)) if constant_time_compare(provided, expected) => Ok(()),
        (None, _) => {
            tracing::warn!("Admin request rejected: ADMIN_PASSWORD is not configured");
            Err(AppError::BadSecret)
        }
        _ => {
            tracing::warn!("Admin request rejected: invalid password");
            Err(AppError::BadSecret)
        }
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    a_bytes.ct_eq(b_bytes).into()
}
