//! Data Transfer Objects for API requests and responses.
//!
//! Request DTOs are validated with `validator`; response DTOs serialize in
//! camelCase to match the stored documents.

pub mod analytics;
pub mod form;
pub mod health;
pub mod pagination;
pub mod responses;
pub mod submission;
pub mod template;
