//! Domain layer containing business entities and logic.
//!
//! Nothing here depends on HTTP or on a particular storage engine.
//!
//! # Architecture
//!
//! - [`entities`] - Forms, field definitions and submitted responses
//! - [`analytics`] - Response aggregation and reporting
//! - [`validation`] - Schema and submission checks
//! - [`templates`] - Built-in form templates
//! - [`export`] - CSV rendering of responses
//! - [`repositories`] - Data access trait definitions
//!
//! # Submission Flow
//!
//! 1. The public handler loads the published form by slug
//! 2. [`validation::validate_submission`] checks the answers against its fields
//! 3. The response is stored via [`repositories::FormRepository::record_response`]
//! 4. Owners read it back through [`analytics::ResponseAggregator`]

pub mod analytics;
pub mod entities;
pub mod export;
pub mod repositories;
pub mod templates;
pub mod validation;
