//! Owner-facing analytics: reports, raw aggregates and CSV export.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use super::form_service::load_owned;
use crate::domain::analytics::{AggregationResult, DateRange, FormReport, ResponseAggregator};
use crate::domain::entities::{Form, FormId};
use crate::domain::export::{csv_file_name, responses_to_csv};
use crate::domain::repositories::FormRepository;
use crate::error::AppError;

/// A rendered CSV download.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvExport {
    pub file_name: String,
    pub body: String,
}

pub struct AnalyticsService<R: FormRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: FormRepository + ?Sized> AnalyticsService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Aggregates the owned form's responses inside `range` into a report
    /// labelled with the current schema.
    ///
    /// `today` anchors bounded ranges; callers pass the current UTC date.
    pub async fn report(
        &self,
        owner_id: &str,
        form_id: FormId,
        range: DateRange,
        top_n: usize,
        today: NaiveDate,
    ) -> Result<(Form, FormReport), AppError> {
        let (form, result) = self.aggregate(owner_id, form_id, range, today).await?;
        let report = FormReport::build(&result, &form.fields, top_n);
        Ok((form, report))
    }

    /// Aggregates the owned form's responses inside `range`.
    pub async fn aggregate(
        &self,
        owner_id: &str,
        form_id: FormId,
        range: DateRange,
        today: NaiveDate,
    ) -> Result<(Form, AggregationResult), AppError> {
        let form = load_owned(self.repository.as_ref(), owner_id, form_id).await?;
        let records = self.repository.list_responses(form_id).await?;

        let result =
            ResponseAggregator::with_schema(&form.fields).aggregate(range.filter(&records, today));
        debug!(
            form_id,
            range = %range,
            total = result.total_responses,
            "Aggregated responses"
        );

        Ok((form, result))
    }

    /// Renders every response of the owned form as CSV, newest first.
    pub async fn export_csv(&self, owner_id: &str, form_id: FormId) -> Result<CsvExport, AppError> {
        load_owned(self.repository.as_ref(), owner_id, form_id).await?;
        let records = self.repository.list_responses(form_id).await?;

        Ok(CsvExport {
            file_name: csv_file_name(form_id),
            body: responses_to_csv(&records),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{FieldDefinition, FieldType, ResponseRecord, SubmittedAt};
    use crate::domain::repositories::MockFormRepository;
    use chrono::{TimeZone, Utc};

    fn form() -> Form {
        let now = Utc::now();
        Form {
            id: 8,
            owner_id: "alice".to_string(),
            slug: "AbCdEfGhIjKl".to_string(),
            title: "Poll".to_string(),
            description: None,
            fields: vec![
                FieldDefinition::new("recommend", FieldType::Radio, "Recommend?")
                    .required()
                    .with_options(["Yes", "No", "Maybe"]),
            ],
            published: true,
            responses_count: 3,
            created_at: now,
            updated_at: now,
            last_response_at: None,
        }
    }

    fn response(id: i64, day: u32, answer: &str) -> ResponseRecord {
        ResponseRecord {
            id,
            form_id: 8,
            submitted_at: SubmittedAt::At(Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()),
            submitted_by: None,
            responses: [("recommend".to_string(), answer.into())].into_iter().collect(),
        }
    }

    fn mock_repo() -> MockFormRepository {
        let mut mock_repo = MockFormRepository::new();
        mock_repo.expect_get_form().returning(|_| Ok(Some(form())));
        mock_repo.expect_list_responses().returning(|_| {
            Ok(vec![
                response(3, 10, "Yes"),
                response(2, 9, "No"),
                response(1, 1, "Yes"),
            ])
        });
        mock_repo
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
    }

    #[tokio::test]
    async fn test_report_for_range() {
        let service = AnalyticsService::new(Arc::new(mock_repo()));

        let (_, all) = service
            .report("alice", 8, DateRange::All, 5, today())
            .await
            .unwrap();
        assert_eq!(all.total_responses, 3);
        assert_eq!(all.fields[0].top_values[0].value, "Yes");
        assert_eq!(all.fields[0].top_values[0].count, 2);

        let (_, week) = service
            .report("alice", 8, DateRange::Week, 5, today())
            .await
            .unwrap();
        assert_eq!(week.total_responses, 2);
        assert_eq!(week.timeline.len(), 2);
    }

    #[tokio::test]
    async fn test_aggregate_requires_ownership() {
        let service = AnalyticsService::new(Arc::new(mock_repo()));

        let err = service
            .aggregate("mallory", 8, DateRange::All, today())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_export_csv() {
        let service = AnalyticsService::new(Arc::new(mock_repo()));

        let export = service.export_csv("alice", 8).await.unwrap();

        assert_eq!(export.file_name, "form-responses-8.csv");
        let lines: Vec<&str> = export.body.lines().collect();
        assert_eq!(lines[0], "id,submittedAt,recommend");
        assert_eq!(lines[1], "3,2024-03-10T12:00:00.000Z,Yes");
        assert_eq!(lines.len(), 4);
    }
}
