//! Handlers for owner-side form management.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::form::{FormListResponse, FormRequest, FormResponse, FromTemplateQuery};
use crate::api::middleware::auth::AuthenticatedOwner;
use crate::domain::entities::FormId;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's forms, newest first.
///
/// # Endpoint
///
/// `GET /api/forms`
pub async fn list_forms_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<AuthenticatedOwner>,
) -> Result<Json<FormListResponse>, AppError> {
    let forms = state.form_service.list_forms(&owner.0).await?;

    let items = forms
        .into_iter()
        .map(|form| FormResponse::from_form(form, &state.public_base_url))
        .collect();

    Ok(Json(FormListResponse { items }))
}

/// Creates an unpublished form.
///
/// # Endpoint
///
/// `POST /api/forms`
///
/// # Request Body
///
/// ```json
/// {
///   "title": "Contact Us",
///   "description": "We will get back to you",
///   "fields": [
///     {"id": "email", "type": "email", "label": "Email", "required": true}
///   ]
/// }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request with per-field messages under `details.fields`
/// when the schema is invalid.
pub async fn create_form_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<AuthenticatedOwner>,
    Json(payload): Json<FormRequest>,
) -> Result<(StatusCode, Json<FormResponse>), AppError> {
    payload.validate()?;

    let form = state
        .form_service
        .create_form(&owner.0, payload.into_draft())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(FormResponse::from_form(form, &state.public_base_url)),
    ))
}

/// Creates an unpublished form from a gallery template.
///
/// # Endpoint
///
/// `POST /api/forms/from-template/{template_id}?title=...`
pub async fn create_from_template_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<AuthenticatedOwner>,
    Path(template_id): Path<String>,
    Query(query): Query<FromTemplateQuery>,
) -> Result<(StatusCode, Json<FormResponse>), AppError> {
    query.validate()?;

    let form = state
        .form_service
        .create_from_template(&owner.0, &template_id, query.title)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(FormResponse::from_form(form, &state.public_base_url)),
    ))
}

/// `GET /api/forms/{id}`
pub async fn get_form_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<AuthenticatedOwner>,
    Path(id): Path<FormId>,
) -> Result<Json<FormResponse>, AppError> {
    let form = state.form_service.get_form(&owner.0, id).await?;

    Ok(Json(FormResponse::from_form(form, &state.public_base_url)))
}

/// Replaces title, description and fields of a form.
///
/// # Endpoint
///
/// `PUT /api/forms/{id}`
///
/// Existing responses are kept even when fields they answered are removed.
pub async fn update_form_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<AuthenticatedOwner>,
    Path(id): Path<FormId>,
    Json(payload): Json<FormRequest>,
) -> Result<Json<FormResponse>, AppError> {
    payload.validate()?;

    let form = state
        .form_service
        .update_form(&owner.0, id, payload.into_draft())
        .await?;

    Ok(Json(FormResponse::from_form(form, &state.public_base_url)))
}

/// Deletes a form together with its responses.
///
/// # Endpoint
///
/// `DELETE /api/forms/{id}`
///
/// Returns 204 No Content on success.
pub async fn delete_form_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<AuthenticatedOwner>,
    Path(id): Path<FormId>,
) -> Result<StatusCode, AppError> {
    state.form_service.delete_form(&owner.0, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/forms/{id}/publish`
pub async fn publish_form_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<AuthenticatedOwner>,
    Path(id): Path<FormId>,
) -> Result<Json<FormResponse>, AppError> {
    let form = state.form_service.set_published(&owner.0, id, true).await?;

    Ok(Json(FormResponse::from_form(form, &state.public_base_url)))
}

/// `POST /api/forms/{id}/unpublish`
pub async fn unpublish_form_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<AuthenticatedOwner>,
    Path(id): Path<FormId>,
) -> Result<Json<FormResponse>, AppError> {
    let form = state.form_service.set_published(&owner.0, id, false).await?;

    Ok(Json(FormResponse::from_form(form, &state.public_base_url)))
}
