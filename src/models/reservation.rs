//! Reservation model matching the front end's reservation form.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::is_truthy;

/// Maximum number of reservations kept in the store.
pub const MAX_RESERVATIONS: usize = 100;

pub const DEFAULT_PHONE: &str = "Not provided";
pub const DEFAULT_BATCH: &str = "No preference";
pub const DEFAULT_PICKUP_DATE: &str = "Not specified";
pub const STATUS_PENDING: &str = "pending";

/// A reservation as persisted and echoed back to the submitter.
///
/// Form fields are kept as whatever JSON the submitter sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub name: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub email: Value,
    pub phone: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub quantity: Value,
    pub batch: Value,
    pub pickup_date: Value,
    pub message: Value,
    pub status: String,
    pub submitted_at: String,
    pub submitted_date: String,
}

/// Request body for the reservation form. Nothing is rejected here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub email: Value,
    #[serde(default)]
    pub phone: Value,
    /// Number or numeric string, kept as sent
    #[serde(default)]
    pub quantity: Value,
    #[serde(default)]
    pub batch: Value,
    #[serde(default)]
    pub pickup_date: Value,
    #[serde(default)]
    pub message: Value,
}

impl Reservation {
    /// Build a pending reservation from the form, stamped at `now`.
    pub fn from_request(request: ReservationRequest, now: DateTime<Utc>) -> Self {
        Self {
            id: next_reservation_id(now),
            name: request.name,
            email: request.email,
            phone: or_default(request.phone, DEFAULT_PHONE),
            quantity: request.quantity,
            batch: or_default(request.batch, DEFAULT_BATCH),
            pickup_date: or_default(request.pickup_date, DEFAULT_PICKUP_DATE),
            message: or_default(request.message, ""),
            status: STATUS_PENDING.to_string(),
            submitted_at: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            submitted_date: now.format("%-m/%-d/%Y").to_string(),
        }
    }

    /// Name for commit messages and notifications.
    pub fn display_name(&self) -> String {
        value_text(&self.name).unwrap_or_else(|| "unknown".to_string())
    }
}

/// Plain text for a form value; `None` for `null`.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Keep a provided value, otherwise fall back to `default`.
fn or_default(value: Value, default: &str) -> Value {
    if is_truthy(&value) {
        value
    } else {
        Value::String(default.to_string())
    }
}

static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Millisecond timestamp id, bumped so ids issued by this process strictly increase.
fn next_reservation_id(now: DateTime<Utc>) -> i64 {
    let candidate = now.timestamp_millis();
    let mut last = LAST_ID.load(Ordering::SeqCst);
    loop {
        let next = candidate.max(last + 1);
        match LAST_ID.compare_exchange(last, next, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

/// The persisted reservation list, most recent first.
///
/// Entries are kept as raw JSON: the admin dashboard may rewrite the file with
/// records of any shape, and those must survive the next submission untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationStore {
    #[serde(default)]
    pub reservations: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ReservationStore {
    /// Put `reservation` at the head and drop the oldest past the limit.
    pub fn prepend(&mut self, reservation: Value) {
        self.reservations.insert(0, reservation);
        self.reservations.truncate(MAX_RESERVATIONS);
    }

    pub fn len(&self) -> usize {
        self.reservations.len()
    }
}
