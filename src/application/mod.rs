//! Application layer services implementing business logic.
//!
//! Services coordinate repository calls, validation and ownership rules, and
//! give HTTP handlers and the admin CLI a single API.
//!
//! # Available Services
//!
//! - [`services::form_service::FormService`] - Form lifecycle and public lookup
//! - [`services::response_service::ResponseService`] - Submissions and response listing
//! - [`services::analytics_service::AnalyticsService`] - Reports and CSV export
//! - [`services::auth_service::AuthService`] - API token authentication

pub mod services;
