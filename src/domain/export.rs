//! CSV rendering of stored responses.

use crate::domain::entities::{AnswerValue, FormId, ResponseRecord};

/// Separator between selected options of a multi-choice answer.
pub const MULTI_VALUE_SEPARATOR: &str = "; ";

/// Download name for a form's export.
pub fn csv_file_name(form_id: FormId) -> String {
    format!("form-responses-{form_id}.csv")
}

/// Renders `records` as CSV, one row per record in input order.
///
/// Columns are `id`, `submittedAt` and then every field id in the order it is
/// first seen across the records.
pub fn responses_to_csv(records: &[ResponseRecord]) -> String {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for field_id in record.responses.keys() {
            if !columns.contains(&field_id.as_str()) {
                columns.push(field_id);
            }
        }
    }

    let mut lines = Vec::with_capacity(records.len() + 1);

    let header = ["id", "submittedAt"]
        .into_iter()
        .chain(columns.iter().copied())
        .map(escape_cell)
        .collect::<Vec<_>>()
        .join(",");
    lines.push(header);

    for record in records {
        let mut cells = vec![record.id.to_string(), escape_cell(&record.submitted_at.to_string())];
        cells.extend(columns.iter().map(|column| {
            record
                .responses
                .get(*column)
                .map(|answer| escape_cell(&answer_cell(answer)))
                .unwrap_or_default()
        }));
        lines.push(cells.join(","));
    }

    lines.join("\n")
}

fn answer_cell(answer: &AnswerValue) -> String {
    match answer {
        AnswerValue::Empty => String::new(),
        AnswerValue::Text(text) => text.clone(),
        AnswerValue::MultiChoice(values) => values.join(MULTI_VALUE_SEPARATOR),
        AnswerValue::File(file) => file.url.clone(),
        AnswerValue::Other(value) => value.to_string(),
    }
}

/// Quotes a cell when it contains a comma, quote, CR or LF.
fn escape_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
