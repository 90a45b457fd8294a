//! Chart- and card-ready view of an [`AggregationResult`] joined with a schema.

use serde::Serialize;

use super::aggregator::{AggregationResult, DailyCount, ValueCount};
use crate::domain::entities::{FieldDefinition, FieldType};

/// Statistics for one field, labelled from the schema when possible.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldReport {
    pub field_id: String,
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub field_type: Option<FieldType>,
    /// False for answers to fields that were removed from the form.
    pub in_schema: bool,
    pub answered: u64,
    pub completion_pct: f64,
    pub top_values: Vec<ValueCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormReport {
    pub total_responses: u64,
    pub undated_responses: u64,
    pub complete_responses: Option<u64>,
    pub completion_pct: Option<f64>,
    pub timeline: Vec<DailyCount>,
    pub fields: Vec<FieldReport>,
}

impl FormReport {
    /// Schema fields come first in schema order (including unanswered ones),
    /// followed by orphaned field ids in id order.
    pub fn build(result: &AggregationResult, schema: &[FieldDefinition], top_n: usize) -> Self {
        let total = result.total_responses;

        let mut fields: Vec<FieldReport> = schema
            .iter()
            .map(|definition| {
                let analytics = result.field(&definition.id);
                FieldReport {
                    field_id: definition.id.clone(),
                    label: Some(definition.label.clone()),
                    field_type: Some(definition.field_type),
                    in_schema: true,
                    answered: analytics.map(|a| a.total).unwrap_or(0),
                    completion_pct: analytics.map(|a| a.completion(total)).unwrap_or(0.0),
                    top_values: analytics.map(|a| a.top_values(top_n)).unwrap_or_default(),
                }
            })
            .collect();

        fields.extend(
            result
                .field_analytics
                .iter()
                .filter(|(id, _)| !schema.iter().any(|f| &f.id == *id))
                .map(|(id, analytics)| FieldReport {
                    field_id: id.clone(),
                    label: None,
                    field_type: None,
                    in_schema: false,
                    answered: analytics.total,
                    completion_pct: analytics.completion(total),
                    top_values: analytics.top_values(top_n),
                }),
        );

        Self {
            total_responses: total,
            undated_responses: result.undated_responses,
            complete_responses: result.complete_responses,
            completion_pct: result.completion_rate(),
            timeline: result.daily_series_filled(),
            fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analytics::ResponseAggregator;
    use crate::domain::entities::{ResponseRecord, SubmittedAt};
    use chrono::{TimeZone, Utc};

    fn record(id: i64, answers: Vec<(&str, &str)>) -> ResponseRecord {
        ResponseRecord {
            id,
            form_id: 1,
            submitted_at: SubmittedAt::At(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()),
            submitted_by: None,
            responses: answers
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.into()))
                .collect(),
        }
    }

    #[test]
    fn test_report_orders_schema_then_orphans() {
        let schema = vec![
            FieldDefinition::new("recommend", FieldType::Radio, "Would you recommend us?")
                .required()
                .with_options(["Yes", "No", "Maybe"]),
            FieldDefinition::new("comment", FieldType::LongText, "Comment"),
        ];
        let records = vec![
            record(1, vec![("recommend", "Yes"), ("legacy", "a")]),
            record(2, vec![("recommend", "No")]),
            record(3, vec![("recommend", "Yes"), ("archived", "b")]),
        ];

        let result = ResponseAggregator::with_schema(&schema).aggregate(&records);
        let report = FormReport::build(&result, &schema, 1);

        let ids: Vec<&str> = report.fields.iter().map(|f| f.field_id.as_str()).collect();
        assert_eq!(ids, vec!["recommend", "comment", "archived", "legacy"]);

        let recommend = &report.fields[0];
        assert_eq!(recommend.label.as_deref(), Some("Would you recommend us?"));
        assert_eq!(recommend.answered, 3);
        assert_eq!(recommend.completion_pct, 100.0);
        assert_eq!(
            recommend.top_values,
            vec![ValueCount {
                value: "Yes".into(),
                count: 2
            }]
        );

        let comment = &report.fields[1];
        assert_eq!(comment.answered, 0);
        assert!(comment.top_values.is_empty());

        assert!(!report.fields[2].in_schema);
        assert!(report.fields[2].label.is_none());

        assert_eq!(report.total_responses, 3);
        assert_eq!(report.complete_responses, Some(3));
        assert_eq!(report.completion_pct, Some(100.0));
        assert_eq!(report.timeline.len(), 1);
    }

    #[test]
    fn test_report_for_empty_batch() {
        let schema = vec![FieldDefinition::new("name", FieldType::ShortText, "Name")];
        let result = ResponseAggregator::with_schema(&schema).aggregate(&[]);
        let report = FormReport::build(&result, &schema, 5);

        assert_eq!(report.total_responses, 0);
        assert_eq!(report.fields.len(), 1);
        assert_eq!(report.fields[0].completion_pct, 0.0);
        assert_eq!(report.completion_pct, Some(0.0));
        assert!(report.timeline.is_empty());
    }
}
