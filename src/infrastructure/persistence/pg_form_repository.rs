//! PostgreSQL implementation of form repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use sqlx::types::Json;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::entities::{
    AnswerValue, FieldDefinition, Form, FormId, NewResponse, ResponseRecord, SaveForm,
    SubmittedAt,
};
use crate::domain::repositories::FormRepository;
use crate::error::AppError;

const FORM_COLUMNS: &str = "id, owner_id, slug, title, description, fields, published, \
     responses_count, created_at, updated_at, last_response_at";

const RESPONSE_COLUMNS: &str = "id, form_id, submitted_at, submitted_by, answers";

#[derive(sqlx::FromRow)]
struct FormRow {
    id: i64,
    owner_id: String,
    slug: String,
    title: String,
    description: Option<String>,
    fields: Json<Vec<FieldDefinition>>,
    published: bool,
    responses_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_response_at: Option<DateTime<Utc>>,
}

impl From<FormRow> for Form {
    fn from(row: FormRow) -> Self {
        Form {
            id: row.id,
            owner_id: row.owner_id,
            slug: row.slug,
            title: row.title,
            description: row.description,
            fields: row.fields.0,
            published: row.published,
            responses_count: row.responses_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_response_at: row.last_response_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ResponseRow {
    id: i64,
    form_id: i64,
    submitted_at: DateTime<Utc>,
    submitted_by: Option<String>,
    answers: Json<BTreeMap<String, AnswerValue>>,
}

impl From<ResponseRow> for ResponseRecord {
    fn from(row: ResponseRow) -> Self {
        ResponseRecord {
            id: row.id,
            form_id: row.form_id,
            submitted_at: SubmittedAt::At(row.submitted_at),
            submitted_by: row.submitted_by,
            responses: row.answers.0,
        }
    }
}

/// PostgreSQL repository for forms and responses.
///
/// Field definitions and answers are stored as JSONB documents.
pub struct PgFormRepository {
    pool: Arc<PgPool>,
}

impl PgFormRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FormRepository for PgFormRepository {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }

    async fn list_forms(&self, owner_id: &str) -> Result<Vec<Form>, AppError> {
        let rows: Vec<FormRow> = sqlx::query_as(&format!(
            "SELECT {FORM_COLUMNS} FROM forms WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Form::from).collect())
    }

    async fn get_form(&self, id: FormId) -> Result<Option<Form>, AppError> {
        let row: Option<FormRow> =
            sqlx::query_as(&format!("SELECT {FORM_COLUMNS} FROM forms WHERE id = $1"))
                .bind(id)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(row.map(Form::from))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Form>, AppError> {
        let row: Option<FormRow> =
            sqlx::query_as(&format!("SELECT {FORM_COLUMNS} FROM forms WHERE slug = $1"))
                .bind(slug)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(row.map(Form::from))
    }

    async fn save_form(&self, save: SaveForm) -> Result<Form, AppError> {
        let SaveForm {
            id,
            owner_id,
            slug,
            draft,
            published,
        } = save;

        let Some(id) = id else {
            let row: FormRow = sqlx::query_as(&format!(
                r#"
                INSERT INTO forms (owner_id, slug, title, description, fields, published)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING {FORM_COLUMNS}
                "#
            ))
            .bind(&owner_id)
            .bind(&slug)
            .bind(&draft.title)
            .bind(&draft.description)
            .bind(Json(&draft.fields))
            .bind(published)
            .fetch_one(self.pool.as_ref())
            .await?;

            return Ok(row.into());
        };

        let row: Option<FormRow> = sqlx::query_as(&format!(
            r#"
            UPDATE forms
            SET title = $2, description = $3, fields = $4, published = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING {FORM_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&draft.title)
        .bind(&draft.description)
        .bind(Json(&draft.fields))
        .bind(published)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Form::from)
            .ok_or_else(|| AppError::not_found("Form not found", json!({ "id": id })))
    }

    async fn delete_form(&self, id: FormId) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM forms WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_responses(&self, form_id: FormId) -> Result<Vec<ResponseRecord>, AppError> {
        let rows: Vec<ResponseRow> = sqlx::query_as(&format!(
            "SELECT {RESPONSE_COLUMNS} FROM form_responses WHERE form_id = $1 \
             ORDER BY submitted_at DESC, id DESC"
        ))
        .bind(form_id)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ResponseRecord::from).collect())
    }

    async fn list_responses_page(
        &self,
        form_id: FormId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<ResponseRecord>, AppError> {
        let rows: Vec<ResponseRow> = sqlx::query_as(&format!(
            "SELECT {RESPONSE_COLUMNS} FROM form_responses WHERE form_id = $1 \
             ORDER BY submitted_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        ))
        .bind(form_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(ResponseRecord::from).collect())
    }

    async fn count_responses(&self, form_id: FormId) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM form_responses WHERE form_id = $1")
            .bind(form_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn record_response(
        &self,
        form_id: FormId,
        response: NewResponse,
    ) -> Result<ResponseRecord, AppError> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE forms
            SET responses_count = responses_count + 1,
                last_response_at = GREATEST(last_response_at, $2)
            WHERE id = $1
            "#,
        )
        .bind(form_id)
        .bind(response.submitted_at)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Form not found",
                json!({ "id": form_id }),
            ));
        }

        let row: ResponseRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO form_responses (form_id, submitted_at, submitted_by, answers)
            VALUES ($1, $2, $3, $4)
            RETURNING {RESPONSE_COLUMNS}
            "#
        ))
        .bind(form_id)
        .bind(response.submitted_at)
        .bind(&response.submitted_by)
        .bind(Json(&response.responses))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }
}
