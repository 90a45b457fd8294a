//! Submitted responses and the answer values they carry.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use super::form::FormId;

pub type ResponseId = i64;

/// Reference to an uploaded file stored in blob storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRef {
    pub url: String,
    pub file_name: String,
    pub content_type: String,
    pub size: u64,
}

/// A single answer keyed by field id.
///
/// On the wire answers are untagged JSON: a string, a list of strings
/// (checkbox), or a file reference object. `Empty` is an explicit `null`;
/// anything else is preserved as `Other` so imported documents never fail to
/// load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Empty,
    Text(String),
    MultiChoice(Vec<String>),
    File(FileRef),
    Other(Value),
}

impl AnswerValue {
    /// True when the answer carries nothing a respondent typed or picked.
    pub fn is_blank(&self) -> bool {
        match self {
            AnswerValue::Empty => true,
            AnswerValue::Text(text) => text.trim().is_empty(),
            AnswerValue::MultiChoice(values) => values.is_empty(),
            AnswerValue::File(_) => false,
            AnswerValue::Other(value) => value.is_null(),
        }
    }

    /// Trims surrounding whitespace from typed text and selected options.
    pub fn normalized(self) -> Self {
        match self {
            AnswerValue::Text(text) => AnswerValue::Text(text.trim().to_string()),
            AnswerValue::MultiChoice(values) => {
                AnswerValue::MultiChoice(values.iter().map(|v| v.trim().to_string()).collect())
            }
            other => other,
        }
    }

    /// Short description of the value shape, used in validation messages.
    pub fn kind(&self) -> &'static str {
        match self {
            AnswerValue::Empty => "empty",
            AnswerValue::Text(_) => "text",
            AnswerValue::MultiChoice(_) => "list",
            AnswerValue::File(_) => "file",
            AnswerValue::Other(_) => "unsupported value",
        }
    }
}

impl From<&str> for AnswerValue {
    fn from(text: &str) -> Self {
        AnswerValue::Text(text.to_string())
    }
}

impl From<String> for AnswerValue {
    fn from(text: String) -> Self {
        AnswerValue::Text(text)
    }
}

impl From<Vec<&str>> for AnswerValue {
    fn from(values: Vec<&str>) -> Self {
        AnswerValue::MultiChoice(values.into_iter().map(str::to_string).collect())
    }
}

impl From<FileRef> for AnswerValue {
    fn from(file: FileRef) -> Self {
        AnswerValue::File(file)
    }
}

/// Submission timestamp as stored.
///
/// Records written by this service always carry [`SubmittedAt::At`]; records
/// imported from other stores may carry epoch milliseconds or free text, which
/// is parsed on demand and may turn out to be unparseable. Anything else,
/// including a missing or `null` timestamp, is kept as `Other`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubmittedAt {
    At(DateTime<Utc>),
    EpochMillis(i64),
    Raw(String),
    Other(Value),
}

impl Default for SubmittedAt {
    fn default() -> Self {
        SubmittedAt::Other(Value::Null)
    }
}

impl SubmittedAt {
    /// Resolves the timestamp to a UTC instant.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            SubmittedAt::At(at) => Some(*at),
            SubmittedAt::EpochMillis(millis) => DateTime::from_timestamp_millis(*millis),
            SubmittedAt::Raw(text) => parse_timestamp(text),
            SubmittedAt::Other(Value::Number(number)) => number
                .as_f64()
                .filter(|millis| millis.is_finite())
                .and_then(|millis| DateTime::from_timestamp_millis(millis.round() as i64)),
            SubmittedAt::Other(_) => None,
        }
    }

    /// UTC calendar day of the submission.
    pub fn utc_day(&self) -> Option<NaiveDate> {
        self.to_utc().map(|at| at.date_naive())
    }
}

impl From<DateTime<Utc>> for SubmittedAt {
    fn from(at: DateTime<Utc>) -> Self {
        SubmittedAt::At(at)
    }
}

impl fmt::Display for SubmittedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rfc3339 = |at: DateTime<Utc>| at.to_rfc3339_opts(SecondsFormat::Millis, true);
        match self {
            SubmittedAt::At(at) => f.write_str(&rfc3339(*at)),
            SubmittedAt::EpochMillis(millis) => match self.to_utc() {
                Some(at) => f.write_str(&rfc3339(at)),
                None => write!(f, "{millis}"),
            },
            SubmittedAt::Raw(text) => match self.to_utc() {
                Some(at) => f.write_str(&rfc3339(at)),
                None => f.write_str(text),
            },
            SubmittedAt::Other(value) => match (self.to_utc(), value) {
                (Some(at), _) => f.write_str(&rfc3339(at)),
                (None, Value::Null) => Ok(()),
                (None, value) => write!(f, "{value}"),
            },
        }
    }
}

/// Parses the timestamp notations seen in stored documents.
///
/// Naive date-times and bare dates are taken to be UTC.
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(at.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| naive.and_utc());
    }

    if let Ok(at) = DateTime::parse_from_rfc2822(text) {
        return Some(at.with_timezone(&Utc));
    }

    if text.bytes().all(|b| b.is_ascii_digit()) {
        return text
            .parse::<i64>()
            .ok()
            .and_then(DateTime::from_timestamp_millis);
    }

    None
}

/// One end-user submission against a form. Immutable once stored.
///
/// Documents exported from other stores may carry string ids; non-numeric ids
/// load as `0`. A missing or `null` answer map loads as empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: ResponseId,
    #[serde(default, deserialize_with = "lenient_id")]
    pub form_id: FormId,
    #[serde(default)]
    pub submitted_at: SubmittedAt,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_by: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub responses: BTreeMap<String, AnswerValue>,
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|n| n as i64))
            .unwrap_or_default(),
        Value::String(text) => text.trim().parse().unwrap_or_default(),
        _ => 0,
    })
}

fn null_as_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<BTreeMap<String, AnswerValue>, D::Error> {
    Ok(Option::<BTreeMap<String, AnswerValue>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response documents loaded from a JSON dump.
#[derive(Debug, Default)]
pub struct ImportedResponses {
    pub records: Vec<ResponseRecord>,
    /// Entries that were not response objects at all.
    pub skipped: usize,
}

/// Loads a JSON array of response documents.
///
/// Entries that cannot be read as a response are skipped with a warning; only
/// a file that is not a JSON array fails as a whole.
pub fn parse_response_documents(raw: &str) -> Result<ImportedResponses, serde_json::Error> {
    let documents: Vec<Value> = serde_json::from_str(raw)?;
    let mut imported = ImportedResponses::default();

    for (index, document) in documents.into_iter().enumerate() {
        match serde_json::from_value::<ResponseRecord>(document) {
            Ok(record) => imported.records.push(record),
            Err(error) => {
                warn!(index, error = %error, "Skipping malformed response document");
                imported.skipped += 1;
            }
        }
    }

    Ok(imported)
}

/// Input data for recording a new response.
#[derive(Debug, Clone, PartialEq)]
pub struct NewResponse {
    pub submitted_at: DateTime<Utc>,
    pub submitted_by: Option<String>,
    pub responses: BTreeMap<String, AnswerValue>,
}
