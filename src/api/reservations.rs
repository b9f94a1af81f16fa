//! Reservation submission.

use axum::{body::Bytes, extract::State, Json};
use chrono::Utc;
use serde::Serialize;

use super::{commit_timestamp, parse_body, FunctionResult};
use crate::errors::AppError;
use crate::models::{Reservation, ReservationRequest, ReservationStore};
use crate::notify::notify_best_effort;
use crate::store::RESERVATIONS_PATH;
use crate::AppState;

const CONTEXT: &str = "Failed to submit reservation";

#[derive(Debug, Serialize)]
pub struct SubmitReservationResponse {
    pub success: bool,
    pub message: &'static str,
    pub reservation: Reservation,
}

/// POST /api/submit-reservation - Record a reservation and notify the farm.
pub async fn submit_reservation(
    State(state): State<AppState>,
    body: Bytes,
) -> FunctionResult<SubmitReservationResponse> {
    let reservation = record_reservation(&state, &body)
        .await
        .map_err(|e| e.context(CONTEXT))?;

    notify_best_effort(state.notifier.as_ref(), &reservation).await;

    Ok(Json(SubmitReservationResponse {
        success: true,
        message: "Reservation received! We'll contact you soon.",
        reservation,
    }))
}

async fn record_reservation(state: &AppState, body: &Bytes) -> Result<Reservation, AppError> {
    let request: ReservationRequest = parse_body(body)?;
    let reservation = Reservation::from_request(request, Utc::now());

    let (mut list, revision) = match state.store.read(RESERVATIONS_PATH).await? {
        Some(file) => {
            tracing::debug!(path = %file.path, revision = %file.revision, "Loaded reservations");
            (
                serde_json::from_value::<ReservationStore>(file.content)?,
                Some(file.revision),
            )
        }
        None => (ReservationStore::default(), None),
    };

    list.prepend(serde_json::to_value(&reservation)?);

    let message = format!(
        "New reservation from {} - {}",
        reservation.display_name(),
        commit_timestamp()
    );
    state
        .store
        .write(
            RESERVATIONS_PATH,
            &serde_json::to_value(&list)?,
            revision.as_deref(),
            &message,
        )
        .await?;

    tracing::info!(
        reservation_id = reservation.id,
        stored = list.len(),
        "Reservation recorded"
    );
    Ok(reservation)
}
