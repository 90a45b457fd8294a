//! In-process token repository used when no database is configured and in tests.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;
use tokio::sync::RwLock;

use crate::domain::repositories::{ApiToken, TokenRepository};
use crate::error::AppError;

#[derive(Default)]
pub struct MemoryTokenRepository {
    tokens: RwLock<Vec<ApiToken>>,
}

impl MemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenRepository for MemoryTokenRepository {
    async fn validate_token(&self, token_hash: &str) -> Result<Option<String>, AppError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .iter()
            .find(|t| t.token_hash == token_hash && t.is_active())
            .map(|t| t.owner_id.clone()))
    }

    async fn update_last_used(&self, token_hash: &str) -> Result<(), AppError> {
        let mut tokens = self.tokens.write().await;
        if let Some(token) = tokens
            .iter_mut()
            .find(|t| t.token_hash == token_hash && t.is_active())
        {
            token.last_used_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn create_token(
        &self,
        name: &str,
        owner_id: &str,
        token_hash: &str,
    ) -> Result<ApiToken, AppError> {
        let mut tokens = self.tokens.write().await;
        if tokens
            .iter()
            .any(|t| t.name == name || t.token_hash == token_hash)
        {
            return Err(AppError::conflict(
                "Unique constraint violation",
                json!({ "constraint": "api_tokens_name_key" }),
            ));
        }

        let token = ApiToken {
            id: tokens.len() as i64 + 1,
            name: name.to_string(),
            owner_id: owner_id.to_string(),
            token_hash: token_hash.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
            revoked_at: None,
        };
        tokens.push(token.clone());
        Ok(token)
    }

    async fn list_tokens(&self) -> Result<Vec<ApiToken>, AppError> {
        Ok(self.tokens.read().await.iter().rev().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<ApiToken>, AppError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<ApiToken>, AppError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.iter().find(|t| t.name == name).cloned())
    }

    async fn revoke_token(&self, id: i64) -> Result<bool, AppError> {
        let mut tokens = self.tokens.write().await;
        match tokens.iter_mut().find(|t| t.id == id && t.is_active()) {
            Some(token) => {
                token.revoked_at = Some(Utc::now());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_token_lifecycle() {
        let repo = MemoryTokenRepository::new();
        let token = repo.create_token("ci", "alice", "hash-1").await.unwrap();

        assert_eq!(
            repo.validate_token("hash-1").await.unwrap().as_deref(),
            Some("alice")
        );
        assert!(repo.validate_token("hash-2").await.unwrap().is_none());

        repo.update_last_used("hash-1").await.unwrap();
        let stored = repo.find_by_name("ci").await.unwrap().unwrap();
        assert!(stored.last_used_at.is_some());

        assert!(repo.revoke_token(token.id).await.unwrap());
        assert!(!repo.revoke_token(token.id).await.unwrap());
        assert!(repo.validate_token("hash-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_conflicts() {
        let repo = MemoryTokenRepository::new();
        repo.create_token("ci", "alice", "hash-1").await.unwrap();

        let err = repo.create_token("ci", "bob", "hash-2").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict { .. }));
    }
}
