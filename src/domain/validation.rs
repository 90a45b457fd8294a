//! Form schema and submission validation.
//!
//! Both validators collect at most one message per key and return them all at
//! once so a client can highlight every offending input.

use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use url::Url;

use crate::domain::entities::{AnswerValue, FieldDefinition, FieldType, FileRef};

/// Validation messages keyed by field id (or schema path such as `fields[2].options`).
pub type FieldErrors = BTreeMap<String, String>;

pub const MAX_TITLE_LENGTH: usize = 200;

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PHONE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[\d\s-]{10,}$").unwrap());
static FIELD_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").unwrap());

pub const REQUIRED_MESSAGE: &str = "This field is required";
pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PHONE_MESSAGE: &str = "Please enter a valid phone number";

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_REGEX.is_match(value)
}

/// Checks a form title and field list before it is saved.
pub fn validate_schema(title: &str, fields: &[FieldDefinition]) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    let title = title.trim();
    if title.is_empty() {
        errors.insert("title".into(), "Please enter a form title".into());
    } else if title.chars().count() > MAX_TITLE_LENGTH {
        errors.insert(
            "title".into(),
            format!("Title must be at most {MAX_TITLE_LENGTH} characters"),
        );
    }

    let mut seen_ids = HashSet::new();
    for (position, field) in fields.iter().enumerate() {
        let key = |attr: &str| format!("fields[{position}].{attr}");

        if !FIELD_ID_REGEX.is_match(&field.id) {
            errors.insert(
                key("id"),
                "Field id must be 1-64 letters, digits, '_' or '-'".into(),
            );
        } else if !seen_ids.insert(field.id.as_str()) {
            errors.insert(key("id"), format!("Duplicate field id '{}'", field.id));
        }

        if field.label.trim().is_empty() {
            errors.insert(key("label"), "Field label is required".into());
        }

        if field.field_type.has_options() {
            if let Some(message) = check_options(&field.options) {
                errors.insert(key("options"), message);
            }
        } else if !field.options.is_empty() {
            errors.insert(
                key("options"),
                format!("Options are not supported for {} fields", field.field_type),
            );
        }

        if field.field_type == FieldType::File {
            if field.max_size == Some(0) {
                errors.insert(key("maxSize"), "Maximum file size must be positive".into());
            }
        } else if field.allowed_types.is_some() || field.max_size.is_some() {
            errors.insert(
                key("allowedTypes"),
                "File constraints are only supported for file fields".into(),
            );
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_options(options: &[String]) -> Option<String> {
    if options.is_empty() {
        return Some("At least one option is required".into());
    }
    if options.iter().any(|o| o.trim().is_empty()) {
        return Some("Options must not be blank".into());
    }
    let mut seen = HashSet::new();
    if let Some(duplicate) = options.iter().find(|o| !seen.insert(o.as_str())) {
        return Some(format!("Duplicate option '{duplicate}'"));
    }
    None
}

/// Checks submitted answers against the form's fields.
pub fn validate_submission(
    fields: &[FieldDefinition],
    answers: &BTreeMap<String, AnswerValue>,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    for field_id in answers.keys() {
        if !fields.iter().any(|f| &f.id == field_id) {
            errors.insert(field_id.clone(), "Unknown field".into());
        }
    }

    for field in fields {
        match answers.get(&field.id) {
            None => {
                if field.required {
                    errors.insert(field.id.clone(), REQUIRED_MESSAGE.into());
                }
            }
            Some(answer) if answer.is_blank() => {
                if field.required {
                    errors.insert(field.id.clone(), REQUIRED_MESSAGE.into());
                }
            }
            Some(answer) => {
                if let Err(message) = check_answer(field, answer) {
                    errors.insert(field.id.clone(), message);
                }
            }
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn check_answer(field: &FieldDefinition, answer: &AnswerValue) -> Result<(), String> {
    match (field.field_type, answer) {
        (FieldType::Checkbox, AnswerValue::MultiChoice(selected)) => {
            match selected.iter().find(|s| !field.options.contains(s)) {
                Some(unknown) => Err(format!("'{unknown}' is not one of the available options")),
                None => Ok(()),
            }
        }
        (FieldType::Checkbox, other) => Err(format!(
            "Expected a list of selected options, got {}",
            other.kind()
        )),
        (FieldType::File, AnswerValue::File(file)) => check_file(field, file),
        (FieldType::File, other) => Err(format!(
            "Expected an uploaded file reference, got {}",
            other.kind()
        )),
        (field_type, AnswerValue::Text(text)) => check_text(field, field_type, text.trim()),
        (_, other) => Err(format!("Expected a single value, got {}", other.kind())),
    }
}

fn check_text(field: &FieldDefinition, field_type: FieldType, text: &str) -> Result<(), String> {
    let custom = || field.error_message.clone();
    match field_type {
        FieldType::Email if !is_valid_email(text) => {
            Err(custom().unwrap_or_else(|| EMAIL_MESSAGE.into()))
        }
        FieldType::Phone if !is_valid_phone(text) => {
            Err(custom().unwrap_or_else(|| PHONE_MESSAGE.into()))
        }
        FieldType::Radio if !field.options.iter().any(|o| o == text) => {
            Err(format!("'{text}' is not one of the available options"))
        }
        FieldType::Date if !is_valid_date(text) => {
            Err("Please enter a valid date (YYYY-MM-DD)".into())
        }
        _ => Ok(()),
    }
}

fn is_valid_date(text: &str) -> bool {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").is_ok() || DateTime::parse_from_rfc3339(text).is_ok()
}

fn check_file(field: &FieldDefinition, file: &FileRef) -> Result<(), String> {
    match Url::parse(&file.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => return Err("File URL must be an absolute http(s) URL".into()),
    }

    if let (Some(limit), Some(max_mb)) = (field.max_size_bytes(), field.max_size)
        && file.size > limit
    {
        return Err(format!("File size must be less than {max_mb}MB"));
    }

    let allowed = field.allowed_extensions();
    if !allowed.is_empty() {
        let name = file.file_name.to_ascii_lowercase();
        if !allowed.iter().any(|ext| name.ends_with(ext.as_str())) {
            return Err(format!("File type not allowed (allowed: {})", allowed.join(",")));
        }
    }

    Ok(())
}
