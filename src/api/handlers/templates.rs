//! Handler for the template gallery.

use axum::Json;

use crate::api::dto::template::TemplateListResponse;
use crate::domain::templates::{CATEGORIES, catalog};

/// `GET /api/templates`
pub async fn list_templates_handler() -> Json<TemplateListResponse> {
    Json(TemplateListResponse {
        categories: &CATEGORIES,
        items: catalog(),
    })
}
