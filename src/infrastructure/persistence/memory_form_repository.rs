//! In-process form repository used when no database is configured and in tests.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use std::collections::BTreeMap;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::entities::{Form, FormId, NewResponse, ResponseRecord, SaveForm, SubmittedAt};
use crate::domain::repositories::FormRepository;
use crate::error::AppError;

#[derive(Default)]
struct Store {
    next_form_id: FormId,
    next_response_id: i64,
    forms: BTreeMap<FormId, Form>,
    responses: BTreeMap<FormId, Vec<ResponseRecord>>,
}

/// Keeps forms and responses in memory. Data is lost on restart.
#[derive(Default)]
pub struct MemoryFormRepository {
    store: RwLock<Store>,
}

impl MemoryFormRepository {
    pub fn new() -> Self {
        debug!("Using in-memory form storage");
        Self::default()
    }
}

#[async_trait]
impl FormRepository for MemoryFormRepository {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn list_forms(&self, owner_id: &str) -> Result<Vec<Form>, AppError> {
        let store = self.store.read().await;
        let mut forms: Vec<Form> = store
            .forms
            .values()
            .filter(|form| form.is_owned_by(owner_id))
            .cloned()
            .collect();
        forms.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(forms)
    }

    async fn get_form(&self, id: FormId) -> Result<Option<Form>, AppError> {
        Ok(self.store.read().await.forms.get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Form>, AppError> {
        let store = self.store.read().await;
        Ok(store.forms.values().find(|form| form.slug == slug).cloned())
    }

    async fn save_form(&self, save: SaveForm) -> Result<Form, AppError> {
        let mut store = self.store.write().await;
        let now = Utc::now();

        let Some(id) = save.id else {
            if store.forms.values().any(|form| form.slug == save.slug) {
                return Err(AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": "forms_slug_key" }),
                ));
            }

            store.next_form_id += 1;
            let form = Form {
                id: store.next_form_id,
                owner_id: save.owner_id,
                slug: save.slug,
                title: save.draft.title,
                description: save.draft.description,
                fields: save.draft.fields,
                published: save.published,
                responses_count: 0,
                created_at: now,
                updated_at: now,
                last_response_at: None,
            };
            store.forms.insert(form.id, form.clone());
            return Ok(form);
        };

        let form = store
            .forms
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Form not found", json!({ "id": id })))?;
        form.title = save.draft.title;
        form.description = save.draft.description;
        form.fields = save.draft.fields;
        form.published = save.published;
        form.updated_at = now;
        Ok(form.clone())
    }

    async fn delete_form(&self, id: FormId) -> Result<bool, AppError> {
        let mut store = self.store.write().await;
        store.responses.remove(&id);
        Ok(store.forms.remove(&id).is_some())
    }

    async fn list_responses(&self, form_id: FormId) -> Result<Vec<ResponseRecord>, AppError> {
        let store = self.store.read().await;
        let mut records = store.responses.get(&form_id).cloned().unwrap_or_default();
        records.sort_by(|a, b| {
            b.submitted_at
                .to_utc()
                .cmp(&a.submitted_at.to_utc())
                .then(b.id.cmp(&a.id))
        });
        Ok(records)
    }

    async fn list_responses_page(
        &self,
        form_id: FormId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ResponseRecord>, AppError> {
        let records = self.list_responses(form_id).await?;
        Ok(records
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect())
    }

    async fn count_responses(&self, form_id: FormId) -> Result<i64, AppError> {
        let store = self.store.read().await;
        Ok(store.responses.get(&form_id).map_or(0, |records| records.len() as i64))
    }

    async fn record_response(
        &self,
        form_id: FormId,
        response: NewResponse,
    ) -> Result<ResponseRecord, AppError> {
        let mut store = self.store.write().await;
        store.next_response_id += 1;
        let id = store.next_response_id;

        let form = store
            .forms
            .get_mut(&form_id)
            .ok_or_else(|| AppError::not_found("Form not found", json!({ "id": form_id })))?;
        form.responses_count += 1;
        form.last_response_at = form.last_response_at.max(Some(response.submitted_at));

        let record = ResponseRecord {
            id,
            form_id,
            submitted_at: SubmittedAt::At(response.submitted_at),
            submitted_by: response.submitted_by,
            responses: response.responses,
        };
        store
            .responses
            .entry(form_id)
            .or_default()
            .push(record.clone());
        Ok(record)
    }
}
