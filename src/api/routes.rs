//! API route configuration.

use crate::api::handlers::{
    analytics_handler, create_form_handler, create_from_template_handler, delete_form_handler,
    export_csv_handler, get_form_handler, list_forms_handler, list_responses_handler,
    list_templates_handler, public_form_handler, publish_form_handler, raw_analytics_handler,
    submit_response_handler, unpublish_form_handler, update_form_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Owner routes, protected by Bearer token authentication via
/// [`crate::api::middleware::auth`].
///
/// # Endpoints
///
/// - `GET    /templates`                         - Template gallery
/// - `GET    /forms`                             - List the caller's forms
/// - `POST   /forms`                             - Create a form
/// - `POST   /forms/from-template/{template_id}` - Create a form from a template
/// - `GET    /forms/{id}`                        - Get a form
/// - `PUT    /forms/{id}`                        - Replace a form's schema
/// - `DELETE /forms/{id}`                        - Delete a form and its responses
/// - `POST   /forms/{id}/publish`                - Open the share link
/// - `POST   /forms/{id}/unpublish`              - Close the share link
/// - `GET    /forms/{id}/responses`              - Stored responses (paginated)
/// - `GET    /forms/{id}/analytics`              - Labelled report
/// - `GET    /forms/{id}/analytics/raw`          - Raw aggregate
/// - `GET    /forms/{id}/export.csv`             - CSV download
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/templates", get(list_templates_handler))
        .route("/forms", get(list_forms_handler).post(create_form_handler))
        .route(
            "/forms/from-template/{template_id}",
            post(create_from_template_handler),
        )
        .route(
            "/forms/{id}",
            get(get_form_handler)
                .put(update_form_handler)
                .delete(delete_form_handler),
        )
        .route("/forms/{id}/publish", post(publish_form_handler))
        .route("/forms/{id}/unpublish", post(unpublish_form_handler))
        .route("/forms/{id}/responses", get(list_responses_handler))
        .route("/forms/{id}/analytics", get(analytics_handler))
        .route("/forms/{id}/analytics/raw", get(raw_analytics_handler))
        .route("/forms/{id}/export.csv", get(export_csv_handler))
}

/// Respondent routes, no authentication.
///
/// # Endpoints
///
/// - `GET  /f/{slug}`           - Published form
/// - `POST /f/{slug}/responses` - Submit a response
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/f/{slug}", get(public_form_handler))
        .route("/f/{slug}/responses", post(submit_response_handler))
}
