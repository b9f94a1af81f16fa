//! Password-gated dashboard functions.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

use super::{commit_timestamp, parse_body, FunctionResult};
use crate::auth::verify_admin_password;
use crate::errors::{AppError, INVALID_PASSWORD};
use crate::models::{
    provided, submitted_password, BatchCatalog, PasswordRequest, UpdateBatchesRequest,
    UpdateContentRequest,
};
use crate::store::{replace_document, BATCHES_PATH, CONTENT_PATH, RESERVATIONS_PATH};
use crate::AppState;

const REDEPLOY_NOTE: &str = "Site will redeploy in 1-2 minutes.";

#[derive(Debug, Serialize)]
pub struct UpdateBatchesResponse {
    pub success: bool,
    pub message: String,
    pub data: Option<BatchCatalog>,
}

#[derive(Debug, Serialize)]
pub struct UpdateContentResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ValidatePasswordResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

fn admin_commit_message(path: &str) -> String {
    format!("Update {} via admin dashboard - {}", path, commit_timestamp())
}

/// POST /api/update-batches - Replace the batch catalog.
pub async fn update_batches(
    State(state): State<AppState>,
    body: Bytes,
) -> FunctionResult<UpdateBatchesResponse> {
    let data = apply_batches_update(&state, &body)
        .await
        .map_err(|e| e.context("Failed to update batches"))?;

    Ok(Json(UpdateBatchesResponse {
        success: true,
        message: format!("Batches updated successfully! {}", REDEPLOY_NOTE),
        data,
    }))
}

async fn apply_batches_update(
    state: &AppState,
    body: &Bytes,
) -> Result<Option<BatchCatalog>, AppError> {
    let request: UpdateBatchesRequest = parse_body(body)?;
    verify_admin_password(
        state.config.admin_password.as_deref(),
        submitted_password(&request.password),
    )?;

    let batches = provided(request.batches);
    let availability = provided(request.availability);
    if batches.is_none() && availability.is_none() {
        tracing::info!("Batch update carried no documents; nothing written");
        return Ok(None);
    }

    let catalog = BatchCatalog::from_parts(batches, availability, Utc::now().date_naive());
    replace_document(
        state.store.as_ref(),
        BATCHES_PATH,
        &serde_json::to_value(&catalog)?,
        &admin_commit_message(BATCHES_PATH),
    )
    .await?;

    Ok(Some(catalog))
}

/// POST /api/update-content - Overwrite any of the site's JSON documents.
///
/// Documents are written one after another; a failure partway leaves the
/// earlier ones updated.
pub async fn update_content(
    State(state): State<AppState>,
    body: Bytes,
) -> FunctionResult<UpdateContentResponse> {
    apply_content_update(&state, &body)
        .await
        .map_err(|e| e.context("Failed to update content"))?;

    Ok(Json(UpdateContentResponse {
        success: true,
        message: format!("Content updated successfully! {}", REDEPLOY_NOTE),
    }))
}

async fn apply_content_update(state: &AppState, body: &Bytes) -> Result<(), AppError> {
    let request: UpdateContentRequest = parse_body(body)?;
    verify_admin_password(
        state.config.admin_password.as_deref(),
        submitted_password(&request.password),
    )?;

    let documents: [(&str, Option<Value>); 3] = [
        (BATCHES_PATH, provided(request.batches)),
        (CONTENT_PATH, provided(request.content)),
        (RESERVATIONS_PATH, provided(request.reservations)),
    ];

    for (path, document) in documents {
        if let Some(document) = document {
            replace_document(
                state.store.as_ref(),
                path,
                &document,
                &admin_commit_message(path),
            )
            .await?;
        }
    }

    Ok(())
}

/// POST /api/validate-password - Check the dashboard password.
pub async fn validate_password(State(state): State<AppState>, body: Bytes) -> Response {
    let request: PasswordRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(e) => return e.context("Server error").into_response(),
    };

    let checked = verify_admin_password(
        state.config.admin_password.as_deref(),
        submitted_password(&request.password),
    );

    match checked {
        Ok(()) => Json(ValidatePasswordResponse {
            valid: true,
            error: None,
        })
        .into_response(),
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(ValidatePasswordResponse {
                valid: false,
                error: Some(INVALID_PASSWORD),
            }),
        )
            .into_response(),
    }
}
