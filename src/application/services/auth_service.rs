//! Authentication service for API token validation and issuance.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::repositories::{ApiToken, TokenRepository};
use crate::error::AppError;
use crate::utils::code_generator::generate_token;
use serde_json::json;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Service for authenticating API requests via Bearer tokens.
///
/// Tokens are hashed with HMAC-SHA256 (keyed by `signing_secret`) before storage
/// and comparison. An attacker with read-only access to the database cannot verify
/// or forge tokens without the server-side secret.
pub struct AuthService<R: TokenRepository + ?Sized> {
    repository: Arc<R>,
    signing_secret: String,
}

impl<R: TokenRepository + ?Sized> AuthService<R> {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `repository` - token repository
    /// - `signing_secret` - HMAC key; must match the value used when tokens were created
    pub fn new(repository: Arc<R>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    pub fn hash_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Authenticates a raw token and returns the owner it acts as.
    ///
    /// On success the token's `last_used_at` is refreshed; a failure to do so
    /// is logged and does not reject the request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn authenticate(&self, token: &str) -> Result<String, AppError> {
        let token_hash = self.hash_token(token);

        let Some(owner_id) = self.repository.validate_token(&token_hash).await? else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ));
        };

        if let Err(e) = self.repository.update_last_used(&token_hash).await {
            warn!(error = %e, "Failed to update token last_used_at");
        }

        Ok(owner_id)
    }

    /// Stores a new token for `owner_id` and returns it with its raw value.
    ///
    /// A random 48-character token is generated unless `raw_token` is given.
    /// The raw value is never stored and cannot be recovered later.
    pub async fn issue_token(
        &self,
        name: &str,
        owner_id: &str,
        raw_token: Option<String>,
    ) -> Result<(ApiToken, String), AppError> {
        let raw_token = raw_token.unwrap_or_else(generate_token);
        let token = self
            .repository
            .create_token(name, owner_id, &self.hash_token(&raw_token))
            .await?;

        Ok((token, raw_token))
    }
}
