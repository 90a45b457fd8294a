//! DTOs for public form submissions.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{AnswerValue, ResponseId, ResponseRecord};

/// Body of `POST /f/{slug}/responses`.
///
/// `responses` maps field ids to answers; ids not in the form are rejected.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    #[serde(default)]
    pub responses: BTreeMap<String, AnswerValue>,

    #[validate(length(max = 320, message = "submittedBy must be at most 320 characters"))]
    pub submitted_by: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: ResponseId,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl From<&ResponseRecord> for SubmissionResponse {
    fn from(record: &ResponseRecord) -> Self {
        Self {
            id: record.id,
            submitted_at: record.submitted_at.to_utc(),
        }
    }
}
