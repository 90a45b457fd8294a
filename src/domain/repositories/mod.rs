//! Repository trait definitions for the domain layer.
//!
//! Implementations live in `crate::infrastructure::persistence`; mock
//! implementations are generated via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`FormRepository`] - Forms and submitted responses
//! - [`TokenRepository`] - API token authentication

pub mod form_repository;
pub mod token_repository;

pub use form_repository::FormRepository;
pub use token_repository::{ApiToken, TokenRepository};

#[cfg(test)]
pub use form_repository::MockFormRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
