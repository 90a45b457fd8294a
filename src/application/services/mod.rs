//! Business logic services for the application layer.

pub mod analytics_service;
pub mod auth_service;
pub mod form_service;
pub mod response_service;

pub use analytics_service::{AnalyticsService, CsvExport};
pub use auth_service::AuthService;
pub use form_service::FormService;
pub use response_service::{ResponsePage, ResponseService};
