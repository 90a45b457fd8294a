//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod analytics;
pub mod forms;
pub mod health;
pub mod public;
pub mod responses;
pub mod templates;

pub use analytics::{analytics_handler, export_csv_handler, raw_analytics_handler};
pub use forms::{
    create_form_handler, create_from_template_handler, delete_form_handler, get_form_handler,
    list_forms_handler, publish_form_handler, unpublish_form_handler, update_form_handler,
};
pub use health::health_handler;
pub use public::{public_form_handler, submit_response_handler};
pub use responses::list_responses_handler;
pub use templates::list_templates_handler;
