//! Form lifecycle service: create, edit, publish and delete forms.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};

use crate::domain::entities::{Form, FormDraft, FormId, SaveForm};
use crate::domain::repositories::FormRepository;
use crate::domain::templates;
use crate::domain::validation::validate_schema;
use crate::error::AppError;
use crate::utils::code_generator::{generate_slug, is_valid_slug};

/// Attempts at finding an unused slug before giving up.
const SLUG_ATTEMPTS: usize = 10;

/// Service for managing forms on behalf of their owner.
///
/// Every owner-scoped operation reports a form belonging to someone else as
/// not found.
pub struct FormService<R: FormRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: FormRepository + ?Sized> FormService<R> {
    /// Creates a new form service.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Checks that storage is reachable.
    pub async fn ping(&self) -> Result<(), AppError> {
        self.repository.ping().await
    }

    /// Lists the owner's forms, newest first.
    pub async fn list_forms(&self, owner_id: &str) -> Result<Vec<Form>, AppError> {
        self.repository.list_forms(owner_id).await
    }

    /// Retrieves one of the owner's forms.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the form does not exist or belongs to
    /// another owner.
    pub async fn get_form(&self, owner_id: &str, id: FormId) -> Result<Form, AppError> {
        load_owned(self.repository.as_ref(), owner_id, id).await
    }

    /// Creates an unpublished form with a fresh public slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the title or fields are invalid.
    /// Returns [`AppError::Conflict`] if no unused slug was found.
    pub async fn create_form(&self, owner_id: &str, draft: FormDraft) -> Result<Form, AppError> {
        validate_schema(&draft.title, &draft.fields)
            .map_err(|errors| AppError::invalid_fields("Form validation failed", &errors))?;

        let slug = self.generate_unique_slug().await?;
        let form = self
            .repository
            .save_form(SaveForm {
                id: None,
                owner_id: owner_id.to_string(),
                slug,
                draft,
                published: false,
            })
            .await?;

        metrics::counter!("formly_forms_created_total").increment(1);
        info!(form_id = form.id, owner_id, slug = %form.slug, "Form created");

        Ok(form)
    }

    /// Creates a form pre-filled from a built-in template.
    ///
    /// `title` overrides the template title when given.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown template id.
    pub async fn create_from_template(
        &self,
        owner_id: &str,
        template_id: &str,
        title: Option<String>,
    ) -> Result<Form, AppError> {
        let template = templates::find(template_id).ok_or_else(|| {
            AppError::not_found("Template not found", json!({ "template_id": template_id }))
        })?;

        let draft = FormDraft {
            title: title.unwrap_or_else(|| template.title.to_string()),
            description: Some(template.description.to_string()),
            fields: template.fields.clone(),
        };

        self.create_form(owner_id, draft).await
    }

    /// Replaces a form's title, description and fields.
    ///
    /// Published forms stay published, so they must keep at least one field.
    pub async fn update_form(
        &self,
        owner_id: &str,
        id: FormId,
        draft: FormDraft,
    ) -> Result<Form, AppError> {
        let form = self.get_form(owner_id, id).await?;

        validate_schema(&draft.title, &draft.fields)
            .map_err(|errors| AppError::invalid_fields("Form validation failed", &errors))?;
        if form.published && draft.fields.is_empty() {
            return Err(publish_requires_fields(id));
        }

        let updated = self
            .repository
            .save_form(SaveForm::update(&form, draft, form.published))
            .await?;
        debug!(form_id = id, "Form updated");

        Ok(updated)
    }

    /// Publishes or unpublishes a form.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when publishing a form without fields.
    pub async fn set_published(
        &self,
        owner_id: &str,
        id: FormId,
        published: bool,
    ) -> Result<Form, AppError> {
        let form = self.get_form(owner_id, id).await?;

        if published && form.fields.is_empty() {
            return Err(publish_requires_fields(id));
        }
        if form.published == published {
            return Ok(form);
        }

        let form = self
            .repository
            .save_form(SaveForm::republish(&form, published))
            .await?;
        info!(form_id = id, published, "Form visibility changed");

        Ok(form)
    }

    /// Deletes a form and all its responses.
    pub async fn delete_form(&self, owner_id: &str, id: FormId) -> Result<(), AppError> {
        self.get_form(owner_id, id).await?;

        if !self.repository.delete_form(id).await? {
            return Err(form_not_found(id));
        }
        info!(form_id = id, owner_id, "Form deleted");

        Ok(())
    }

    /// Looks up a published form by its public slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the slug is unknown or the form is
    /// not published.
    pub async fn get_published_form(&self, slug: &str) -> Result<Form, AppError> {
        load_published(self.repository.as_ref(), slug).await
    }

    /// Generates a slug that no existing form uses.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] after [`SLUG_ATTEMPTS`] collisions.
    async fn generate_unique_slug(&self) -> Result<String, AppError> {
        for _ in 0..SLUG_ATTEMPTS {
            let slug = generate_slug()?;
            if self.repository.find_by_slug(&slug).await?.is_none() {
                return Ok(slug);
            }
            debug!(slug = %slug, "Slug collision, retrying");
        }

        Err(AppError::conflict(
            "Failed to generate a unique form slug",
            json!({ "attempts": SLUG_ATTEMPTS }),
        ))
    }
}

/// Loads a form and checks it belongs to `owner_id`.
pub(crate) async fn load_owned<R: FormRepository + ?Sized>(
    repository: &R,
    owner_id: &str,
    id: FormId,
) -> Result<Form, AppError> {
    match repository.get_form(id).await? {
        Some(form) if form.is_owned_by(owner_id) => Ok(form),
        _ => Err(form_not_found(id)),
    }
}

/// Loads a published form by slug.
pub(crate) async fn load_published<R: FormRepository + ?Sized>(
    repository: &R,
    slug: &str,
) -> Result<Form, AppError> {
    let not_found = || AppError::not_found("Form not found", json!({ "slug": slug }));

    if !is_valid_slug(slug) {
        return Err(not_found());
    }

    match repository.find_by_slug(slug).await? {
        Some(form) if form.published => Ok(form),
        _ => Err(not_found()),
    }
}

fn form_not_found(id: FormId) -> AppError {
    AppError::not_found("Form not found", json!({ "id": id }))
}

fn publish_requires_fields(id: FormId) -> AppError {
    AppError::bad_request(
        "A published form needs at least one field",
        json!({ "id": id }),
    )
}
