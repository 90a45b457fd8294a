//! Random identifiers: public form slugs and API tokens.

use crate::error::AppError;
use base64::Engine as _;
use rand::Rng;
use serde_json::json;

/// Length of random bytes before base64 encoding.
const SLUG_LENGTH_BYTES: usize = 9;

/// Length of generated API tokens.
pub const TOKEN_LENGTH: usize = 48;

const TOKEN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generates a random public slug.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, producing a 12-character slug.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
pub fn generate_slug() -> Result<String, AppError> {
    let mut buffer = [0u8; SLUG_LENGTH_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        AppError::internal(
            "Failed to generate random bytes",
            json!({ "reason": e.to_string() }),
        )
    })?;

    Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer))
}

/// Whether `slug` has the shape produced by [`generate_slug`].
pub fn is_valid_slug(slug: &str) -> bool {
    slug.len() == 12
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Generates an alphanumeric API token of [`TOKEN_LENGTH`] characters.
pub fn generate_token() -> String {
    let mut rng = rand::rng();
    (0..TOKEN_LENGTH)
        .map(|_| TOKEN_CHARSET[rng.random_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}
