//! Response aggregation: per-field value frequencies and a per-day histogram.
//!
//! The aggregator is a pure function over already-fetched records. It performs
//! no I/O, keeps no state between calls and never fails: malformed input
//! degrades into a smaller summary instead of an error.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::domain::entities::{AnswerValue, FieldDefinition, ResponseRecord};

/// Number of times one answer value was given.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: u64,
}

/// Frequency table of answer values, remembering first-encountered order.
///
/// Equality compares counts only; first-seen order exists to break ranking
/// ties and does not make two tables with the same counts different.
/// Serializes as a JSON object in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct ValueCounts {
    entries: Vec<ValueCount>,
    index: HashMap<String, usize>,
}

impl ValueCounts {
    pub fn increment(&mut self, value: &str) {
        match self.index.get(value) {
            Some(&position) => self.entries[position].count += 1,
            None => {
                self.index.insert(value.to_string(), self.entries.len());
                self.entries.push(ValueCount {
                    value: value.to_string(),
                    count: 1,
                });
            }
        }
    }

    /// Count for `value`, zero when never seen.
    pub fn get(&self, value: &str) -> u64 {
        self.index
            .get(value)
            .map(|&position| self.entries[position].count)
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by count descending; ties keep first-encountered order.
    pub fn ranked(&self) -> Vec<&ValueCount> {
        let mut ranked: Vec<&ValueCount> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }

    /// The `n` most frequent values.
    pub fn top(&self, n: usize) -> Vec<ValueCount> {
        self.ranked().into_iter().take(n).cloned().collect()
    }

    fn as_sorted_map(&self) -> BTreeMap<&str, u64> {
        self.entries
            .iter()
            .map(|e| (e.value.as_str(), e.count))
            .collect()
    }
}

impl PartialEq for ValueCounts {
    fn eq(&self, other: &Self) -> bool {
        self.as_sorted_map() == other.as_sorted_map()
    }
}

impl Serialize for ValueCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.value, &entry.count)?;
        }
        map.end()
    }
}

/// Per-field answer statistics.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct FieldAnalytics {
    /// Responses that answered this field, counted once per response.
    pub total: u64,
    pub values: ValueCounts,
}

impl FieldAnalytics {
    /// Share of `total_responses` that answered this field, in percent.
    pub fn completion(&self, total_responses: u64) -> f64 {
        if total_responses == 0 {
            return 0.0;
        }
        self.total as f64 / total_responses as f64 * 100.0
    }

    pub fn top_values(&self, n: usize) -> Vec<ValueCount> {
        self.values.top(n)
    }
}

/// Responses submitted on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// Summary statistics derived from a batch of responses. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregationResult {
    pub total_responses: u64,
    /// Keyed by UTC calendar day.
    pub responses_by_date: BTreeMap<NaiveDate, u64>,
    /// Responses whose timestamp could not be parsed; absent from `responses_by_date`.
    pub undated_responses: u64,
    pub field_analytics: BTreeMap<String, FieldAnalytics>,
    /// Responses answering every required field; only known when a schema was supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complete_responses: Option<u64>,
}

impl AggregationResult {
    pub fn field(&self, field_id: &str) -> Option<&FieldAnalytics> {
        self.field_analytics.get(field_id)
    }

    /// Days with at least one response, oldest first.
    pub fn daily_series(&self) -> Vec<DailyCount> {
        self.responses_by_date
            .iter()
            .map(|(&date, &count)| DailyCount { date, count })
            .collect()
    }

    /// Like [`Self::daily_series`] with zero-count days filled in between the
    /// first and last day.
    pub fn daily_series_filled(&self) -> Vec<DailyCount> {
        let (Some((&first, _)), Some((&last, _))) = (
            self.responses_by_date.first_key_value(),
            self.responses_by_date.last_key_value(),
        ) else {
            return Vec::new();
        };

        let mut series = Vec::new();
        let mut day = first;
        while day <= last {
            series.push(DailyCount {
                date: day,
                count: self.responses_by_date.get(&day).copied().unwrap_or(0),
            });
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        series
    }

    /// Percentage of complete responses, when a schema was supplied.
    pub fn completion_rate(&self) -> Option<f64> {
        let complete = self.complete_responses?;
        if self.total_responses == 0 {
            return Some(0.0);
        }
        Some(complete as f64 / self.total_responses as f64 * 100.0)
    }
}

/// Builds [`AggregationResult`]s, optionally against the owning form's fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseAggregator<'a> {
    schema: Option<&'a [FieldDefinition]>,
}

impl<'a> ResponseAggregator<'a> {
    pub fn new() -> Self {
        Self { schema: None }
    }

    /// Enables completeness tracking against `schema`.
    ///
    /// Answers for fields missing from the schema are still aggregated.
    pub fn with_schema(schema: &'a [FieldDefinition]) -> Self {
        Self {
            schema: Some(schema),
        }
    }

    pub fn aggregate<'r, I>(&self, responses: I) -> AggregationResult
    where
        I: IntoIterator<Item = &'r ResponseRecord>,
    {
        let mut result = AggregationResult {
            complete_responses: self.schema.map(|_| 0),
            ..AggregationResult::default()
        };

        for record in responses {
            result.total_responses += 1;

            match record.submitted_at.utc_day() {
                Some(day) => *result.responses_by_date.entry(day).or_insert(0) += 1,
                None => {
                    result.undated_responses += 1;
                    tracing::warn!(
                        response_id = record.id,
                        form_id = record.form_id,
                        submitted_at = %record.submitted_at,
                        "Unparseable submission timestamp, excluded from daily counts"
                    );
                }
            }

            for (field_id, value) in &record.responses {
                let field = result
                    .field_analytics
                    .entry(field_id.clone())
                    .or_default();
                field.total += 1;

                match value {
                    AnswerValue::MultiChoice(selected) => {
                        for option in selected {
                            field.values.increment(option);
                        }
                    }
                    AnswerValue::Text(text) => field.values.increment(text),
                    AnswerValue::File(_) | AnswerValue::Empty | AnswerValue::Other(_) => {}
                }
            }

            if let (Some(schema), Some(complete)) =
                (self.schema, result.complete_responses.as_mut())
                && is_complete(record, schema)
            {
                *complete += 1;
            }
        }

        result
    }
}

fn is_complete(record: &ResponseRecord, schema: &[FieldDefinition]) -> bool {
    schema.iter().filter(|f| f.required).all(|f| {
        record
            .responses
            .get(&f.id)
            .is_some_and(|answer| !answer.is_blank())
    })
}

/// Aggregates `responses` without a schema.
pub fn aggregate(responses: &[ResponseRecord]) -> AggregationResult {
    ResponseAggregator::new().aggregate(responses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{FieldType, FileRef, SubmittedAt};
    use chrono::{TimeZone, Utc};

    fn record(id: i64, submitted_at: SubmittedAt, answers: Vec<(&str, AnswerValue)>) -> ResponseRecord {
        ResponseRecord {
            id,
            form_id: 1,
            submitted_at,
            submitted_by: None,
            responses: answers
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> SubmittedAt {
        SubmittedAt::At(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rating_fixture() -> Vec<ResponseRecord> {
        vec![
            record(1, at(2024, 2, 16, 9), vec![("rating", "Yes".into())]),
            record(2, at(2024, 2, 16, 15), vec![("rating", "No".into())]),
            record(3, at(2024, 2, 17, 8), vec![("rating", "Yes".into())]),
        ]
    }

    #[test]
    fn test_empty_input_yields_zeroed_result() {
        let result = aggregate(&[]);

        assert_eq!(result.total_responses, 0);
        assert!(result.responses_by_date.is_empty());
        assert!(result.field_analytics.is_empty());
        assert_eq!(result.undated_responses, 0);
        assert!(result.complete_responses.is_none());
        assert!(result.daily_series_filled().is_empty());
    }

    #[test]
    fn test_radio_scenario() {
        let result = aggregate(&rating_fixture());

        assert_eq!(result.total_responses, 3);
        assert_eq!(result.responses_by_date.len(), 2);
        assert_eq!(result.responses_by_date[&day(2024, 2, 16)], 2);
        assert_eq!(result.responses_by_date[&day(2024, 2, 17)], 1);

        let rating = result.field("rating").unwrap();
        assert_eq!(rating.total, 3);
        assert_eq!(rating.values.len(), 2);
        assert_eq!(rating.values.get("Yes"), 2);
        assert_eq!(rating.values.get("No"), 1);
    }

    #[test]
    fn test_checkbox_counts_each_option_but_total_once() {
        let records = vec![record(
            1,
            at(2024, 2, 16, 9),
            vec![("topics", vec!["Tech", "Design"].into())],
        )];

        let result = aggregate(&records);
        let topics = result.field("topics").unwrap();

        assert_eq!(topics.total, 1);
        assert_eq!(topics.values.get("Tech"), 1);
        assert_eq!(topics.values.get("Design"), 1);
    }

    #[test]
    fn test_file_and_empty_answers_count_toward_total_only() {
        let file = FileRef {
            url: "https://files.example.com/a.pdf".into(),
            file_name: "a.pdf".into(),
            content_type: "application/pdf".into(),
            size: 10,
        };
        let records = vec![
            record(1, at(2024, 1, 1, 0), vec![("resume", file.into())]),
            record(2, at(2024, 1, 1, 0), vec![("resume", AnswerValue::Empty)]),
        ];

        let result = aggregate(&records);
        let resume = result.field("resume").unwrap();

        assert_eq!(resume.total, 2);
        assert!(resume.values.is_empty());
    }

    #[test]
    fn test_field_totals_never_exceed_total_responses() {
        let records = vec![
            record(1, at(2024, 3, 1, 1), vec![("a", "x".into()), ("b", vec!["p", "q"].into())]),
            record(2, at(2024, 3, 2, 1), vec![("a", "y".into())]),
            record(3, at(2024, 3, 2, 1), vec![]),
        ];

        let result = aggregate(&records);

        for analytics in result.field_analytics.values() {
            assert!(analytics.total <= result.total_responses);
        }
        let dated: u64 = result.responses_by_date.values().sum();
        assert_eq!(dated + result.undated_responses, result.total_responses);
        assert_eq!(dated, 3);
    }

    #[test]
    fn test_unparseable_timestamp_is_excluded_from_dates() {
        let records = vec![
            record(1, SubmittedAt::Raw("not a date".into()), vec![("a", "x".into())]),
            record(2, at(2024, 3, 2, 1), vec![("a", "x".into())]),
        ];

        let result = aggregate(&records);

        assert_eq!(result.total_responses, 2);
        assert_eq!(result.undated_responses, 1);
        assert_eq!(result.responses_by_date.values().sum::<u64>(), 1);
        assert_eq!(result.field("a").unwrap().total, 2);
    }

    #[test]
    fn test_days_are_bucketed_in_utc() {
        let late_evening_in_new_york = SubmittedAt::Raw("2024-02-16T22:30:00-05:00".into());
        let result = aggregate(&[record(1, late_evening_in_new_york, vec![])]);

        assert_eq!(result.responses_by_date[&day(2024, 2, 17)], 1);
    }

    #[test]
    fn test_aggregation_is_deterministic_and_order_independent() {
        let mut records = rating_fixture();
        records.push(record(
            4,
            at(2024, 2, 18, 8),
            vec![("topics", vec!["Design", "Tech"].into()), ("rating", "Maybe".into())],
        ));

        let first = aggregate(&records);
        let second = aggregate(&records);
        assert_eq!(first, second);

        let mut reversed = records.clone();
        reversed.reverse();
        assert_eq!(aggregate(&reversed), first);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let records = rating_fixture();
        let snapshot = records.clone();

        let _ = aggregate(&records);

        assert_eq!(records, snapshot);
    }

    #[test]
    fn test_fields_missing_from_schema_are_kept() {
        let schema = vec![FieldDefinition::new("rating", FieldType::Radio, "Rating")
            .with_options(["Yes", "No"])];
        let records = vec![record(
            1,
            at(2024, 2, 16, 9),
            vec![("rating", "Yes".into()), ("removed_field", "old answer".into())],
        )];

        let result = ResponseAggregator::with_schema(&schema).aggregate(&records);

        assert_eq!(result.field("removed_field").unwrap().total, 1);
    }

    #[test]
    fn test_complete_responses_against_schema() {
        let schema = vec![
            FieldDefinition::new("name", FieldType::ShortText, "Name").required(),
            FieldDefinition::new("topics", FieldType::Checkbox, "Topics")
                .required()
                .with_options(["Tech", "Design"]),
            FieldDefinition::new("notes", FieldType::LongText, "Notes"),
        ];
        let records = vec![
            record(1, at(2024, 1, 1, 0), vec![("name", "Ada".into()), ("topics", vec!["Tech"].into())]),
            record(2, at(2024, 1, 1, 0), vec![("name", "Bob".into()), ("topics", AnswerValue::MultiChoice(vec![]))]),
            record(3, at(2024, 1, 1, 0), vec![("name", "  ".into()), ("topics", vec!["Design"].into())]),
            record(4, at(2024, 1, 1, 0), vec![("name", "Cy".into()), ("topics", vec!["Design"].into()), ("notes", "hi".into())]),
        ];

        let result = ResponseAggregator::with_schema(&schema).aggregate(&records);

        assert_eq!(result.complete_responses, Some(2));
        assert_eq!(result.completion_rate(), Some(50.0));
    }

    #[test]
    fn test_ranking_is_stable_on_ties() {
        let records = vec![
            record(1, at(2024, 1, 1, 0), vec![("color", "Blue".into())]),
            record(2, at(2024, 1, 1, 0), vec![("color", "Red".into())]),
            record(3, at(2024, 1, 1, 0), vec![("color", "Green".into())]),
            record(4, at(2024, 1, 1, 0), vec![("color", "Green".into())]),
            record(5, at(2024, 1, 1, 0), vec![("color", "Red".into())]),
        ];

        let result = aggregate(&records);
        let ranked: Vec<(String, u64)> = result
            .field("color")
            .unwrap()
            .top_values(3)
            .into_iter()
            .map(|v| (v.value, v.count))
            .collect();

        assert_eq!(
            ranked,
            vec![
                ("Red".to_string(), 2),
                ("Green".to_string(), 2),
                ("Blue".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_completion_percentage() {
        let records = vec![
            record(1, at(2024, 1, 1, 0), vec![("a", "x".into())]),
            record(2, at(2024, 1, 1, 0), vec![]),
            record(3, at(2024, 1, 1, 0), vec![]),
            record(4, at(2024, 1, 1, 0), vec![("a", "y".into())]),
        ];

        let result = aggregate(&records);

        assert_eq!(result.field("a").unwrap().completion(result.total_responses), 50.0);
        assert_eq!(FieldAnalytics::default().completion(0), 0.0);
    }

    #[test]
    fn test_daily_series_filled_inserts_gaps() {
        let records = vec![
            record(1, at(2024, 2, 27, 0), vec![]),
            record(2, at(2024, 3, 1, 0), vec![]),
            record(3, at(2024, 3, 1, 5), vec![]),
        ];

        let result = aggregate(&records);
        let series = result.daily_series_filled();

        assert_eq!(series.len(), 4);
        assert_eq!(series[0], DailyCount { date: day(2024, 2, 27), count: 1 });
        assert_eq!(series[1].count, 0);
        assert_eq!(series[2], DailyCount { date: day(2024, 2, 29), count: 0 });
        assert_eq!(series[3], DailyCount { date: day(2024, 3, 1), count: 2 });
        assert_eq!(result.daily_series().len(), 2);
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(aggregate(&rating_fixture())).unwrap();

        assert_eq!(json["totalResponses"], 3);
        assert_eq!(json["responsesByDate"]["2024-02-16"], 2);
        assert_eq!(json["fieldAnalytics"]["rating"]["total"], 3);
        assert_eq!(json["fieldAnalytics"]["rating"]["values"]["Yes"], 2);
        assert!(json.get("completeResponses").is_none());
    }
}
