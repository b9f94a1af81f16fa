//! Request bodies for the password-gated functions.

use serde::Deserialize;
use serde_json::Value;

/// Body of `validate-password`.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordRequest {
    #[serde(default)]
    pub password: Option<Value>,
}

/// Body of `update-batches`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBatchesRequest {
    #[serde(default)]
    pub password: Option<Value>,
    #[serde(default)]
    pub batches: Option<Value>,
    #[serde(default)]
    pub availability: Option<Value>,
}

/// Body of `update-content`. Each document present is written verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContentRequest {
    #[serde(default)]
    pub password: Option<Value>,
    #[serde(default)]
    pub batches: Option<Value>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub reservations: Option<Value>,
}

/// Whether a submitted document counts as "provided".
///
/// `null`, `false`, `0` and `""` mean the dashboard left the field blank.
/// Empty arrays and objects are real documents.
pub fn is_provided(value: &Option<Value>) -> bool {
    value.as_ref().map(is_truthy).unwrap_or(false)
}

/// JavaScript truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// The submitted password, if it is a string. Anything else can never match.
pub fn submitted_password(password: &Option<Value>) -> Option<&str> {
    password.as_ref().and_then(Value::as_str)
}

/// `Some` only when the value [`is_provided`].
pub fn provided(value: Option<Value>) -> Option<Value> {
    if is_provided(&value) {
        value
    } else {
        None
    }
}
