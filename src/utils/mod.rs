//! Utility functions shared by the server and the admin CLI.
//!
//! - [`code_generator`] - Form slug and API token generation

pub mod code_generator;
