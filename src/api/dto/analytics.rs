//! DTOs for form analytics.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::domain::analytics::{AggregationResult, DateRange, FormReport};
use crate::domain::entities::FormId;

/// Query of the analytics endpoints.
///
/// - `range`: `week`, `month`, `year` or `all` (default)
/// - `top`: number of most frequent values reported per field
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct AnalyticsQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub range: Option<DateRange>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 1, max = 100, message = "top must be between 1 and 100"))]
    pub top: Option<usize>,
}

impl AnalyticsQuery {
    pub fn range(&self) -> DateRange {
        self.range.unwrap_or_default()
    }
}

/// Report for charts and summary cards.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub form_id: FormId,
    pub title: String,
    pub range: DateRange,
    pub today: NaiveDate,
    #[serde(flatten)]
    pub report: FormReport,
}

/// Unlabelled aggregate, keyed by field id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnalyticsResponse {
    pub form_id: FormId,
    pub range: DateRange,
    pub result: AggregationResult,
}
