//! Repository trait for forms and their responses.

use crate::domain::entities::{Form, FormId, NewResponse, ResponseRecord, SaveForm};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for forms and the responses submitted to them.
///
/// Ownership is not checked here; services compare [`Form::owner_id`] with the
/// authenticated owner.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgFormRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::MemoryFormRepository`] - in-process store
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_form.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Checks that the backing store is reachable.
    async fn ping(&self) -> Result<(), AppError>;

    /// Lists forms belonging to `owner_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn list_forms(&self, owner_id: &str) -> Result<Vec<Form>, AppError>;

    /// Finds a form by id regardless of owner.
    async fn get_form(&self, id: FormId) -> Result<Option<Form>, AppError>;

    /// Finds a form by its public slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Form>, AppError>;

    /// Inserts a new form or updates an existing one, see [`SaveForm`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug of a new form is taken.
    /// Returns [`AppError::NotFound`] if `save.id` does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn save_form(&self, save: SaveForm) -> Result<Form, AppError>;

    /// Deletes a form together with all its responses.
    ///
    /// Returns `Ok(false)` if no such form existed.
    async fn delete_form(&self, id: FormId) -> Result<bool, AppError>;

    /// Lists all responses of a form, most recent first.
    async fn list_responses(&self, form_id: FormId) -> Result<Vec<ResponseRecord>, AppError>;

    /// Lists one page of a form's responses in the same order as
    /// [`FormRepository::list_responses`].
    async fn list_responses_page(
        &self,
        form_id: FormId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ResponseRecord>, AppError>;

    /// Counts the stored responses of a form.
    async fn count_responses(&self, form_id: FormId) -> Result<i64, AppError>;

    /// Stores a response and bumps the form's response counter and
    /// `last_response_at` in the same unit of work.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the form does not exist.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn record_response(
        &self,
        form_id: FormId,
        response: NewResponse,
    ) -> Result<ResponseRecord, AppError>;
}
