//! Handlers for form analytics and CSV export.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use chrono::Utc;
use validator::Validate;

use crate::api::dto::analytics::{AnalyticsQuery, AnalyticsResponse, RawAnalyticsResponse};
use crate::api::middleware::auth::AuthenticatedOwner;
use crate::domain::entities::FormId;
use crate::error::AppError;
use crate::state::AppState;

/// Summarizes responses of an owned form.
///
/// # Endpoint
///
/// `GET /api/forms/{id}/analytics?range=week&top=5`
///
/// # Response
///
/// ```json
/// {
///   "formId": 1,
///   "title": "Feedback",
///   "range": "week",
///   "today": "2024-02-16",
///   "totalResponses": 3,
///   "undatedResponses": 0,
///   "completeResponses": 2,
///   "completionPct": 66.7,
///   "timeline": [{"date": "2024-02-16", "count": 3}],
///   "fields": [
///     {"fieldId": "recommend", "label": "Recommend?", "type": "radio",
///      "inSchema": true, "answered": 3, "completionPct": 100.0,
///      "topValues": [{"value": "Yes", "count": 2}, {"value": "No", "count": 1}]}
///   ]
/// }
/// ```
///
/// Window boundaries are UTC calendar days.
pub async fn analytics_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<AuthenticatedOwner>,
    Path(id): Path<FormId>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    query.validate()?;

    let range = query.range();
    let today = Utc::now().date_naive();
    let top_n = query.top.unwrap_or(state.analytics_top_values);

    let (form, report) = state
        .analytics_service
        .report(&owner.0, id, range, top_n, today)
        .await?;

    Ok(Json(AnalyticsResponse {
        form_id: form.id,
        title: form.title,
        range,
        today,
        report,
    }))
}

/// Returns the aggregate keyed by field id without schema labels.
///
/// # Endpoint
///
/// `GET /api/forms/{id}/analytics/raw?range=month`
pub async fn raw_analytics_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<AuthenticatedOwner>,
    Path(id): Path<FormId>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<RawAnalyticsResponse>, AppError> {
    let range = query.range();

    let (form, result) = state
        .analytics_service
        .aggregate(&owner.0, id, range, Utc::now().date_naive())
        .await?;

    Ok(Json(RawAnalyticsResponse {
        form_id: form.id,
        range,
        result,
    }))
}

/// Downloads every response of an owned form as CSV.
///
/// # Endpoint
///
/// `GET /api/forms/{id}/export.csv`
///
/// Served as an attachment named `form-responses-{id}.csv`.
pub async fn export_csv_handler(
    State(state): State<AppState>,
    Extension(owner): Extension<AuthenticatedOwner>,
    Path(id): Path<FormId>,
) -> Result<impl IntoResponse, AppError> {
    let export = state.analytics_service.export_csv(&owner.0, id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.file_name),
            ),
        ],
        export.body,
    ))
}
