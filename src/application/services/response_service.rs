//! Public response submission and owner-side response listing.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::form_service::{load_owned, load_published};
use crate::domain::entities::{AnswerValue, FormId, NewResponse, ResponseRecord};
use crate::domain::repositories::FormRepository;
use crate::domain::validation::validate_submission;
use crate::error::AppError;

/// One page of a form's responses.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponsePage {
    pub items: Vec<ResponseRecord>,
    pub total_items: usize,
}

pub struct ResponseService<R: FormRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: FormRepository + ?Sized> ResponseService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Validates and stores a submission to the published form `slug`.
    ///
    /// Text answers are trimmed before they are checked, and blank answers to
    /// optional fields are dropped before storing.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the form is unknown or unpublished.
    /// Returns [`AppError::Validation`] with per-field messages when answers
    /// are rejected.
    pub async fn submit(
        &self,
        slug: &str,
        answers: BTreeMap<String, AnswerValue>,
        submitted_by: Option<String>,
    ) -> Result<ResponseRecord, AppError> {
        let form = load_published(self.repository.as_ref(), slug).await?;

        let answers: BTreeMap<String, AnswerValue> = answers
            .into_iter()
            .map(|(field_id, answer)| (field_id, answer.normalized()))
            .collect();

        if let Err(errors) = validate_submission(&form.fields, &answers) {
            debug!(form_id = form.id, rejected = errors.len(), "Submission rejected");
            return Err(AppError::invalid_fields("Submission rejected", &errors));
        }

        let responses = answers
            .into_iter()
            .filter(|(_, answer)| !answer.is_blank())
            .collect();

        let record = self
            .repository
            .record_response(
                form.id,
                NewResponse {
                    submitted_at: Utc::now(),
                    submitted_by,
                    responses,
                },
            )
            .await?;

        metrics::counter!("formly_responses_submitted_total").increment(1);
        info!(form_id = form.id, response_id = record.id, "Response recorded");

        Ok(record)
    }

    /// Lists one page of responses for an owned form, newest first.
    pub async fn list_responses(
        &self,
        owner_id: &str,
        form_id: FormId,
        offset: usize,
        limit: usize,
    ) -> Result<ResponsePage, AppError> {
        load_owned(self.repository.as_ref(), owner_id, form_id).await?;

        let total_items = self.repository.count_responses(form_id).await?;
        let items = self
            .repository
            .list_responses_page(form_id, offset as i64, limit as i64)
            .await?;

        Ok(ResponsePage {
            items,
            total_items: total_items.max(0) as usize,
        })
    }
}
