//! Error handling module for the Backyard Eggs backend.
//!
//! Provides the central error type, its mapping to HTTP status codes and the
//! error body returned by every function.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::notify::NotifyError;
use crate::store::StoreError;

/// Message returned for any request that is not a POST.
pub const METHOD_NOT_ALLOWED: &str = "Method not allowed";

/// Message returned when the admin password does not match.
pub const INVALID_PASSWORD: &str = "Invalid password";

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Wrong HTTP verb
    MethodNotAllowed,
    /// Admin password mismatch
    BadSecret,
    /// Stale revision token on write
    UpstreamConflict(String),
    /// Remote API returned a non-success response or could not be reached
    UpstreamFailure(String),
    /// Body failed to parse
    MalformedInput(String),
    /// Webhook post failed. Never surfaced to the caller.
    NotificationFailure(String),
    /// Invalid configuration value
    Config(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    ///
    /// Only the early checks get their own status; everything else is a 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::BadSecret => StatusCode::UNAUTHORIZED,
            AppError::UpstreamConflict(_)
            | AppError::UpstreamFailure(_)
            | AppError::MalformedInput(_)
            | AppError::NotificationFailure(_)
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::MethodNotAllowed => METHOD_NOT_ALLOWED.to_string(),
            AppError::BadSecret => INVALID_PASSWORD.to_string(),
            AppError::UpstreamConflict(msg) => msg.clone(),
            AppError::UpstreamFailure(msg) => msg.clone(),
            AppError::MalformedInput(msg) => msg.clone(),
            AppError::NotificationFailure(msg) => msg.clone(),
            AppError::Config(msg) => msg.clone(),
        }
    }

    /// Attach the handler context used in the response body.
    pub fn context(self, context: &'static str) -> FunctionError {
        FunctionError {
            context,
            error: self,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedInput(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { .. } => AppError::UpstreamConflict(err.to_string()),
            StoreError::Failure(_) | StoreError::Decode { .. } => {
                AppError::UpstreamFailure(err.to_string())
            }
        }
    }
}

impl From<NotifyError> for AppError {
    fn from(err: NotifyError) -> Self {
        AppError::NotificationFailure(err.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// An error paired with the handler that produced it.
#[derive(Debug)]
pub struct FunctionError {
    pub context: &'static str,
    pub error: AppError,
}

impl IntoResponse for FunctionError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();
        let body = match self.error {
            AppError::MethodNotAllowed | AppError::BadSecret => ErrorResponse {
                error: self.error.message(),
                message: None,
            },
            _ => {
                tracing::error!(context = self.context, error = %self.error, "Function failed");
                ErrorResponse {
                    error: self.context.to_string(),
                    message: Some(self.error.message()),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.context("Server error").into_response()
    }
}
