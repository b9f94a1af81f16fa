//! Batch catalog model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Availability banner shown above the batch list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub status: String,
    pub message: String,
    pub last_updated: String,
}

impl Availability {
    /// Banner used when the dashboard does not send one.
    pub fn default_on(date: NaiveDate) -> Self {
        Self {
            status: "available".to_string(),
            message: "Fresh eggs available now!".to_string(),
            last_updated: date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Contents of `data/batches.json`.
///
/// Batch records are shaped by the front end and stored as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchCatalog {
    pub batches: Value,
    pub availability: Value,
}

impl BatchCatalog {
    /// Fill whichever half the dashboard left out.
    pub fn from_parts(batches: Option<Value>, availability: Option<Value>, today: NaiveDate) -> Self {
        Self {
            batches: batches.unwrap_or_else(|| Value::Array(Vec::new())),
            availability: availability.unwrap_or_else(|| {
                serde_json::to_value(Availability::default_on(today)).unwrap_or(Value::Null)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 1).unwrap()
    }

    #[test]
    fn test_default_availability() {
        let catalog = BatchCatalog::from_parts(Some(json!([{"id": "b1"}])), None, today());

        assert_eq!(catalog.batches, json!([{"id": "b1"}]));
        assert_eq!(
            catalog.availability,
            json!({
                "status": "available",
                "message": "Fresh eggs available now!",
                "lastUpdated": "2026-05-01"
            })
        );
    }

    #[test]
    fn test_missing_batches_become_empty_list() {
        let availability = json!({"status": "sold-out", "message": "Back soon", "lastUpdated": "x"});
        let catalog = BatchCatalog::from_parts(None, Some(availability.clone()), today());

        assert_eq!(catalog.batches, json!([]));
        assert_eq!(catalog.availability, availability);
    }
}
