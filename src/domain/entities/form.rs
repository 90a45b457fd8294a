//! Form entity: a titled, ordered list of fields owned by one user.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::field::FieldDefinition;

pub type FormId = i64;

/// A form definition together with its publication state and counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Form {
    pub id: FormId,
    pub owner_id: String,
    /// Random code used in the public link `/f/{slug}`.
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<FieldDefinition>,
    pub published: bool,
    pub responses_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_response_at: Option<DateTime<Utc>>,
}

impl Form {
    /// Looks up a field by id.
    pub fn field(&self, field_id: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.id == field_id)
    }

    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }

    /// Public link for this form under `base_url`.
    pub fn share_url(&self, base_url: &str) -> String {
        format!("{}/f/{}", base_url.trim_end_matches('/'), self.slug)
    }
}

/// Editable part of a form, as supplied by its owner.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<FieldDefinition>,
}

/// Input for [`crate::domain::repositories::FormRepository::save_form`].
///
/// `id: None` inserts a new form using `slug`; `id: Some(_)` updates the
/// existing form's draft and publication flag, leaving slug, owner and
/// counters untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveForm {
    pub id: Option<FormId>,
    pub owner_id: String,
    pub slug: String,
    pub draft: FormDraft,
    pub published: bool,
}

impl SaveForm {
    /// Builds an update for `form` carrying a new draft.
    pub fn update(form: &Form, draft: FormDraft, published: bool) -> Self {
        Self {
            id: Some(form.id),
            owner_id: form.owner_id.clone(),
            slug: form.slug.clone(),
            draft,
            published,
        }
    }

    /// Builds an update for `form` that only changes publication state.
    pub fn republish(form: &Form, published: bool) -> Self {
        Self::update(
            form,
            FormDraft {
                title: form.title.clone(),
                description: form.description.clone(),
                fields: form.fields.clone(),
            },
            published,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::FieldType;

    fn sample_form() -> Form {
        let now = Utc::now();
        Form {
            id: 3,
            owner_id: "owner-1".to_string(),
            slug: "AbCdEfGhIjKl".to_string(),
            title: "Customer Feedback".to_string(),
            description: None,
            fields: vec![
                FieldDefinition::new("comment", FieldType::ShortText, "Comment"),
                FieldDefinition::new("recommend", FieldType::Radio, "Recommend?")
                    .with_options(["Yes", "No", "Maybe"]),
            ],
            published: false,
            responses_count: 0,
            created_at: now,
            updated_at: now,
            last_response_at: None,
        }
    }

    #[test]
    fn test_field_lookup() {
        let form = sample_form();
        assert_eq!(form.field("recommend").unwrap().options.len(), 3);
        assert!(form.field("missing").is_none());
    }

    #[test]
    fn test_share_url_trims_trailing_slash() {
        let form = sample_form();
        assert_eq!(
            form.share_url("https://forms.example.com/"),
            "https://forms.example.com/f/AbCdEfGhIjKl"
        );
    }

    #[test]
    fn test_republish_keeps_draft() {
        let form = sample_form();
        let save = SaveForm::republish(&form, true);

        assert_eq!(save.id, Some(3));
        assert!(save.published);
        assert_eq!(save.draft.title, form.title);
        assert_eq!(save.draft.fields, form.fields);
        assert!(form.is_owned_by("owner-1"));
    }
}
