//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::{AnalyticsService, AuthService, FormService, ResponseService};
use crate::domain::repositories::{FormRepository, TokenRepository};

#[derive(Clone)]
pub struct AppState {
    pub form_service: Arc<FormService<dyn FormRepository>>,
    pub response_service: Arc<ResponseService<dyn FormRepository>>,
    pub analytics_service: Arc<AnalyticsService<dyn FormRepository>>,
    pub auth_service: Arc<AuthService<dyn TokenRepository>>,
    /// Origin used to build share links.
    pub public_base_url: String,
    /// Top values per field when a report request does not ask for a number.
    pub analytics_top_values: usize,
}

impl AppState {
    /// Wires services over the given repositories.
    pub fn new(
        form_repository: Arc<dyn FormRepository>,
        token_repository: Arc<dyn TokenRepository>,
        token_signing_secret: String,
        public_base_url: String,
        analytics_top_values: usize,
    ) -> Self {
        Self {
            form_service: Arc::new(FormService::new(form_repository.clone())),
            response_service: Arc::new(ResponseService::new(form_repository.clone())),
            analytics_service: Arc::new(AnalyticsService::new(form_repository)),
            auth_service: Arc::new(AuthService::new(token_repository, token_signing_secret)),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            analytics_top_values,
        }
    }
}
