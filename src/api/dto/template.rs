//! DTOs for the template gallery.

use serde::Serialize;

use crate::domain::templates::FormTemplate;

#[derive(Debug, Serialize)]
pub struct TemplateListResponse {
    pub categories: &'static [&'static str],
    pub items: &'static [FormTemplate],
}
