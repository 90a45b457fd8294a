//! Repository implementations.
//!
//! # Repositories
//!
//! - [`PgFormRepository`] - Forms and responses in PostgreSQL (JSONB documents)
//! - [`PgTokenRepository`] - API token storage and validation
//! - [`MemoryFormRepository`], [`MemoryTokenRepository`] - In-process stores
//!   used when `DATABASE_URL` is unset and by the HTTP tests

pub mod memory_form_repository;
pub mod memory_token_repository;
pub mod pg_form_repository;
pub mod pg_token_repository;

pub use memory_form_repository::MemoryFormRepository;
pub use memory_token_repository::MemoryTokenRepository;
pub use pg_form_repository::PgFormRepository;
pub use pg_token_repository::PgTokenRepository;
