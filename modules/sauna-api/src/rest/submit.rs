use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Json;
use tracing::info;

use sauna_common::{NewSubmission, SubmissionType};
use sauna_store::with_deadline;

use super::envelope::{created, ApiError, ApiResult};
use crate::AppState;

pub async fn api_submit(
    State(state): State<Arc<AppState>>,
    body: Result<Json<NewSubmission>, JsonRejection>,
) -> ApiResult {
    let Json(submission) =
        body.map_err(|e| ApiError::bad_request("Invalid submission", e.body_text()))?;

    submission
        .validate()
        .map_err(|e| ApiError::bad_request("Invalid submission", e.to_string()))?;

    // Corrections must point at a sauna that exists.
    if let (SubmissionType::Correction, Some(sauna_id)) =
        (submission.submission_type, submission.sauna_id)
    {
        let existing = with_deadline(state.request_timeout, state.store.get_by_id(sauna_id))
            .await
            .map_err(|e| ApiError::from_store("Failed to fetch sauna", e))?;
        if existing.is_none() {
            return Err(ApiError::not_found(
                "Sauna not found",
                format!("No sauna found with ID: {sauna_id}"),
            ));
        }
    }

    let stored = with_deadline(state.request_timeout, state.store.insert_submission(submission))
        .await
        .map_err(|e| ApiError::from_store("Failed to create submission", e))?;

    // Submitted fields may contain personal details, so only the shape is logged.
    info!(
        submission_id = %stored.id,
        kind = %stored.submission_type,
        sauna_id = ?stored.sauna_id,
        "Submission received"
    );

    Ok(created(stored))
}
