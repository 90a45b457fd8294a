//! Handler for browsing stored responses.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde_json::json;

use crate::api::dto::pagination::{PaginationMeta, PaginationParams};
use crate::api::dto::responses::ResponseListResponse;
use crate::api::middleware::auth::AuthenticatedOwner;
use crate::domain::entities::FormId;
use crate::error::AppError;
use crate::state::AppState;

/// Lists responses of an owned form, newest first.
///
/// # Endpoint
///
/// `GET /api/forms/{id}/responses`
///
/// # Query Parameters
///
/// - `page` (optional): Page number (default: 1)
/// - `page_size` (optional): Items per page (default: 25, max: 500)
///
/// # Errors
///
/// Returns 400 Bad Request if pagination parameters are invalid.
pub async fn list_responses_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<AuthenticatedOwner>,
    Path(id): Path<FormId>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<ResponseListResponse>, AppError> {
    let (offset, limit) = params
        .validate_and_get_offset_limit()
        .map_err(|e| AppError::bad_request(e, json!({})))?;

    let page = state
        .response_service
        .list_responses(&owner.0, id, offset, limit)
        .await?;

    Ok(Json(ResponseListResponse {
        pagination: PaginationMeta::new(params.page(), params.page_size(), page.total_items),
        items: page.items,
    }))
}
