use crate::models::PasswordResetToken;
use crate::repositories::user_repository::{RepositoryError, UserRepository};
use crate::repositories::TokenRepository;
use crate::services::email_service::EmailService;
use crate::services::{password, validation};
use chrono::{Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Reset links die one hour after issuance.
const TOKEN_TTL_SECS: i64 = 3600;

/// Upper bound on reset-email dispatch so a stalled SMTP provider
/// cannot pin the spawned task forever.
const EMAIL_DISPATCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum PasswordResetError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Invalid or expired token")]
    InvalidToken,
    #[error("Password too weak (minimum {min} characters)", min = validation::MIN_PASSWORD_LEN)]
    WeakPassword,
    #[error("Password hashing failed: {0}")]
    HashingError(#[from] password::HashError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct PasswordResetService {
    user_repository: Arc<dyn UserRepository>,
    token_repository: Arc<dyn TokenRepository>,
    email_service: Arc<dyn EmailService>,
}

impl PasswordResetService {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        token_repository: Arc<dyn TokenRepository>,
        email_service: Arc<dyn EmailService>,
    ) -> Self {
        Self {
            user_repository,
            token_repository,
            email_service,
        }
    }

    /// 32 random bytes, hex encoded. 256 bits of entropy.
    fn generate_token() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    fn hash_token(raw_token: &str) -> String {
        hex::encode(Sha256::digest(raw_token.as_bytes()))
    }

    /// Handles a forgot-password request. The outcome is identical to
    /// the caller whether or not the account exists; existence is only
    /// visible in server-side logs.
    pub async fn request_reset(&self, email: &str) -> Result<(), PasswordResetError> {
        let email = email.trim();
        if !validation::is_valid_email(email) {
            return Err(PasswordResetError::InvalidEmail);
        }

        let user = match self.user_repository.find_by_email(email).await? {
            Some(user) => user,
            None => {
                tracing::debug!("Password reset requested for unknown email");
                // Burn the same token work as the live branch so the two
                // paths stay close in latency.
                let _ = Self::hash_token(&Self::generate_token());
                return Ok(());
            }
        };

        let raw_token = self.issue_token(user.id).await?;

        // Fire-and-forget dispatch. The HTTP response never waits on the
        // mail provider.
        let email_service = self.email_service.clone();
        let to_email = user.email.clone();
        tokio::spawn(async move {
            match tokio::time::timeout(
                EMAIL_DISPATCH_TIMEOUT,
                email_service.send_password_reset_email(&to_email, &raw_token),
            )
            .await
            {
                Ok(Ok(())) => tracing::info!("Password reset email dispatched"),
                Ok(Err(e)) => tracing::error!("Failed to send password reset email: {:?}", e),
                Err(_) => tracing::error!("Password reset email dispatch timed out"),
            }
        });

        Ok(())
    }

    /// Mints a reset token for the user and returns the raw value for
    /// out-of-band delivery. Only the sha256 digest is stored.
    pub async fn issue_token(&self, user_id: i64) -> Result<String, PasswordResetError> {
        let raw_token = Self::generate_token();
        let token_hash = Self::hash_token(&raw_token);
        let expires_at = (Utc::now() + Duration::seconds(TOKEN_TTL_SECS)).to_rfc3339();

        self.token_repository
            .create_token(user_id, &token_hash, &expires_at)
            .await?;

        Ok(raw_token)
    }

    /// Looks up the presented token and returns its record if it is
    /// unused and unexpired. Missing, used and expired tokens are
    /// indistinguishable to the caller.
    pub async fn verify_token(
        &self,
        raw_token: &str,
    ) -> Result<PasswordResetToken, PasswordResetError> {
        let token_hash = Self::hash_token(raw_token);

        let record = self
            .token_repository
            .find_by_hash(&token_hash)
            .await?
            .ok_or(PasswordResetError::InvalidToken)?;

        if !record.is_valid(Utc::now()) {
            return Err(PasswordResetError::InvalidToken);
        }

        Ok(record)
    }

    /// Verifies the token, then applies the new credential and consumes
    /// the token in one transaction. A second call with the same token
    /// always fails with `InvalidToken`.
    pub async fn reset_password(
        &self,
        raw_token: &str,
        new_password: &str,
    ) -> Result<(), PasswordResetError> {
        if new_password.len() < validation::MIN_PASSWORD_LEN {
            return Err(PasswordResetError::WeakPassword);
        }

        let record = self.verify_token(raw_token).await?;
        let password_hash = password::hash(new_password)?;
        let used_at = Utc::now().to_rfc3339();

        match self
            .token_repository
            .consume_and_update_password(record.id, record.user_id, &password_hash, &used_at)
            .await
        {
            Ok(()) => Ok(()),
            // Lost a race to another consumer of the same token.
            Err(RepositoryError::NotFound) => Err(PasswordResetError::InvalidToken),
            Err(e) => Err(PasswordResetError::RepositoryError(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Role, User};
    use crate::repositories::token_repository::MockTokenRepository;
    use crate::repositories::user_repository::MockUserRepository;
    use crate::services::email_service::MockEmailService;

    fn service_with(
        user_repo: MockUserRepository,
        token_repo: MockTokenRepository,
    ) -> PasswordResetService {
        PasswordResetService::new(
            Arc::new(user_repo),
            Arc::new(token_repo),
            Arc::new(MockEmailService::new()),
        )
    }

    #[tokio::test]
    async fn test_request_reset_rejects_malformed_email() {
        let service = service_with(MockUserRepository::new(), MockTokenRepository::new());

        let result = service.request_reset("not-an-email").await;
        assert!(matches!(result, Err(PasswordResetError::InvalidEmail)));
    }

    #[tokio::test]
    async fn test_request_reset_unknown_email_is_ok_and_creates_nothing() {
        let mut user_repo = MockUserRepository::new();
        user_repo
            .expect_find_by_email()
            .times(1)
            .returning(|_| Box::pin(async move { Ok(None) }));

        // Token repository has no expectations: any create_token call panics.
        let service = service_with(user_repo, MockTokenRepository::new());

        let result = service.request_reset("ghost@example.com").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_request_reset_known_email_issues_token() {
        let mut user_repo = MockUserRepository::new();
        user_repo.expect_find_by_email().times(1).returning(|_| {
            Box::pin(async move {
                Ok(Some(User {
                    id: 7,
                    email: "alice@example.com".to_string(),
                    password_hash: "hash".to_string(),
                    name: "Alice".to_string(),
                    role: Role::Patient,
                    created_at: None,
                }))
            })
        });

        let mut token_repo = MockTokenRepository::new();
        token_repo
            .expect_create_token()
            .times(1)
            .returning(|user_id, token_hash, expires_at| {
                assert_eq!(user_id, 7);
                // sha256 hex digest, never the raw token
                assert_eq!(token_hash.len(), 64);
                let token = PasswordResetToken {
                    id: 1,
                    user_id,
                    token_hash: token_hash.to_string(),
                    expires_at: expires_at.to_string(),
                    used_at: None,
                    created_at: None,
                };
                Box::pin(async move { Ok(token) })
            });

        let service = service_with(user_repo, token_repo);

        let result = service.request_reset("alice@example.com").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_verify_token_rejects_unknown_token() {
        let mut token_repo = MockTokenRepository::new();
        token_repo
            .expect_find_by_hash()
            .times(1)
            .returning(|_| Box::pin(async move { Ok(None) }));

        let service = service_with(MockUserRepository::new(), token_repo);

        let result = service.verify_token("deadbeef").await;
        assert!(matches!(result, Err(PasswordResetError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_verify_token_rejects_used_token() {
        let mut token_repo = MockTokenRepository::new();
        token_repo.expect_find_by_hash().times(1).returning(|hash| {
            let token = PasswordResetToken {
                id: 1,
                user_id: 7,
                token_hash: hash.to_string(),
                expires_at: (Utc::now() + Duration::hours(1)).to_rfc3339(),
                used_at: Some(Utc::now().to_rfc3339()),
                created_at: None,
            };
            Box::pin(async move { Ok(Some(token)) })
        });

        let service = service_with(MockUserRepository::new(), token_repo);

        let result = service.verify_token("deadbeef").await;
        assert!(matches!(result, Err(PasswordResetError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_verify_token_rejects_expired_token() {
        let mut token_repo = MockTokenRepository::new();
        token_repo.expect_find_by_hash().times(1).returning(|hash| {
            let token = PasswordResetToken {
                id: 1,
                user_id: 7,
                token_hash: hash.to_string(),
                expires_at: (Utc::now() - Duration::seconds(1)).to_rfc3339(),
                used_at: None,
                created_at: None,
            };
            Box::pin(async move { Ok(Some(token)) })
        });

        let service = service_with(MockUserRepository::new(), token_repo);

        let result = service.verify_token("deadbeef").await;
        assert!(matches!(result, Err(PasswordResetError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_reset_password_rejects_weak_password_before_lookup() {
        // No expectations on either repository.
        let service = service_with(MockUserRepository::new(), MockTokenRepository::new());

        let result = service.reset_password("deadbeef", "short").await;
        assert!(matches!(result, Err(PasswordResetError::WeakPassword)));
    }
}
