//! Core domain entities representing the form data model.
//!
//! # Entity Types
//!
//! - [`Form`] - A form definition owned by a user
//! - [`FieldDefinition`] - One input element of a form
//! - [`ResponseRecord`] - One submission against a form
//! - [`AnswerValue`] - A single typed answer inside a submission
//!
//! Creation and update inputs are separate structs ([`SaveForm`],
//! [`FormDraft`], [`NewResponse`]).

pub mod field;
pub mod form;
pub mod response;

pub use field::{FieldDefinition, FieldType};
pub use form::{Form, FormDraft, FormId, SaveForm};
pub use response::{
    AnswerValue, FileRef, ImportedResponses, NewResponse, ResponseId, ResponseRecord, SubmittedAt,
    parse_response_documents,
};
