//! Field definitions making up a form schema.

use serde::{Deserialize, Serialize};

/// The fixed palette of input types a form can be built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    ShortText,
    LongText,
    Email,
    Phone,
    Checkbox,
    Radio,
    Date,
    File,
}

impl FieldType {
    pub const ALL: [FieldType; 8] = [
        FieldType::ShortText,
        FieldType::LongText,
        FieldType::Email,
        FieldType::Phone,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::Date,
        FieldType::File,
    ];

    /// Wire name, e.g. `short_text`.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::ShortText => "short_text",
            FieldType::LongText => "long_text",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Date => "date",
            FieldType::File => "file",
        }
    }

    /// Human-readable palette label.
    pub fn label(self) -> &'static str {
        match self {
            FieldType::ShortText => "Short Text",
            FieldType::LongText => "Long Text",
            FieldType::Email => "Email",
            FieldType::Phone => "Phone",
            FieldType::Checkbox => "Checkbox",
            FieldType::Radio => "Radio",
            FieldType::Date => "Date",
            FieldType::File => "File Upload",
        }
    }

    /// Checkbox and radio fields pick from a list of options.
    pub fn has_options(self) -> bool {
        matches!(self, FieldType::Checkbox | FieldType::Radio)
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One input element of a form.
///
/// `options` only applies to checkbox/radio fields; `allowed_types` and
/// `max_size` (megabytes) only to file fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_types: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u32>,
    /// Replaces the default message for email/phone format errors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl FieldDefinition {
    /// Creates an optional field without options or file constraints.
    pub fn new(id: impl Into<String>, field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_type,
            label: label.into(),
            required: false,
            options: Vec::new(),
            allowed_types: None,
            max_size: None,
            error_message: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options.into_iter().map(Into::into).collect();
        self
    }

    /// Restricts a file field to the given comma-separated extensions and size.
    pub fn accepting(mut self, allowed_types: impl Into<String>, max_size_mb: u32) -> Self {
        self.allowed_types = Some(allowed_types.into());
        self.max_size = Some(max_size_mb);
        self
    }

    /// Allowed file extensions, lowercased, each with a leading dot.
    pub fn allowed_extensions(&self) -> Vec<String> {
        self.allowed_types
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(|ext| ext.trim().to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .map(|ext| {
                if ext.starts_with('.') {
                    ext
                } else {
                    format!(".{ext}")
                }
            })
            .collect()
    }

    /// Maximum upload size in bytes, if limited.
    pub fn max_size_bytes(&self) -> Option<u64> {
        self.max_size.map(|mb| u64::from(mb) * 1024 * 1024)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_wire_names() {
        for field_type in FieldType::ALL {
            let json = serde_json::to_string(&field_type).unwrap();
            assert_eq!(json, format!("\"{}\"", field_type.as_str()));
        }
    }

    #[test]
    fn test_palette_labels() {
        assert_eq!(FieldType::ShortText.label(), "Short Text");
        assert_eq!(FieldType::File.label(), "File Upload");
    }

    #[test]
    fn test_options_only_for_choice_types() {
        assert!(FieldType::Checkbox.has_options());
        assert!(FieldType::Radio.has_options());
        assert!(!FieldType::ShortText.has_options());
        assert!(!FieldType::File.has_options());
    }

    #[test]
    fn test_field_definition_document_shape() {
        let field = FieldDefinition::new("resume", FieldType::File, "Resume")
            .required()
            .accepting(".pdf,.doc,.docx", 5);

        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["allowedTypes"], ".pdf,.doc,.docx");
        assert_eq!(json["maxSize"], 5);
        assert_eq!(json["required"], true);
        assert!(json.get("options").is_none());
    }

    #[test]
    fn test_field_definition_defaults_on_deserialize() {
        let field: FieldDefinition =
            serde_json::from_str(r#"{"id":"name","type":"short_text","label":"Name"}"#).unwrap();

        assert!(!field.required);
        assert!(field.options.is_empty());
        assert!(field.max_size.is_none());
    }

    #[test]
    fn test_allowed_extensions_are_normalized() {
        let field = FieldDefinition::new("f", FieldType::File, "File").accepting(" .PDF, docx ,", 2);

        assert_eq!(field.allowed_extensions(), vec![".pdf", ".docx"]);
        assert_eq!(field.max_size_bytes(), Some(2 * 1024 * 1024));
    }
}
