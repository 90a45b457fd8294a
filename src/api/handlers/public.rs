//! Handlers for respondents: viewing and submitting published forms.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::form::PublicFormResponse;
use crate::api::dto::submission::{SubmissionRequest, SubmissionResponse};
use crate::error::AppError;
use crate::state::AppState;

/// Returns the published form behind a share link.
///
/// # Endpoint
///
/// `GET /f/{slug}`
///
/// # Errors
///
/// Returns 404 Not Found for unknown slugs and unpublished forms alike.
pub async fn public_form_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<PublicFormResponse>, AppError> {
    let form = state.form_service.get_published_form(&slug).await?;

    Ok(Json(form.into()))
}

/// Stores a submission to a published form.
///
/// # Endpoint
///
/// `POST /f/{slug}/responses`
///
/// # Request Body
///
/// ```json
/// {
///   "responses": {
///     "email": "ada@example.com",
///     "topics": ["Tech", "Design"]
///   }
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request with `details.fields` mapping field ids to
/// messages when answers are rejected. Nothing is stored in that case.
pub async fn submit_response_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(payload): Json<SubmissionRequest>,
) -> Result<(StatusCode, Json<SubmissionResponse>), AppError> {
    payload.validate()?;

    let record = state
        .response_service
        .submit(&slug, payload.responses, payload.submitted_by)
        .await?;

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from(&record))))
}
