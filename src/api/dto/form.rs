//! DTOs for form management and the public form view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{FieldDefinition, Form, FormDraft, FormId};

/// Body of `POST /api/forms` and `PUT /api/forms/{id}`.
///
/// Field-level rules are checked by the form service; this only bounds sizes.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FormRequest {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 200, message = "A form can have at most 200 fields"))]
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

impl FormRequest {
    pub fn into_draft(self) -> FormDraft {
        FormDraft {
            title: self.title.trim().to_string(),
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            fields: self.fields,
        }
    }
}

/// Query of `POST /api/forms/from-template/{template_id}`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct FromTemplateQuery {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
}

/// A form as seen by its owner.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormResponse {
    pub id: FormId,
    pub slug: String,
    pub share_url: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldDefinition>,
    pub published: bool,
    pub responses_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_response_at: Option<DateTime<Utc>>,
}

impl FormResponse {
    pub fn from_form(form: Form, base_url: &str) -> Self {
        Self {
            share_url: form.share_url(base_url),
            id: form.id,
            slug: form.slug,
            title: form.title,
            description: form.description,
            fields: form.fields,
            published: form.published,
            responses_count: form.responses_count,
            created_at: form.created_at,
            updated_at: form.updated_at,
            last_response_at: form.last_response_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FormListResponse {
    pub items: Vec<FormResponse>,
}

/// A published form as seen by respondents. Owner data and counters are omitted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicFormResponse {
    pub slug: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub fields: Vec<FieldDefinition>,
}

impl From<Form> for PublicFormResponse {
    fn from(form: Form) -> Self {
        Self {
            slug: form.slug,
            title: form.title,
            description: form.description,
            fields: form.fields,
        }
    }
}
