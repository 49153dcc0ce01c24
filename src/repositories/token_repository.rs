use crate::models::PasswordResetToken;
use crate::repositories::user_repository::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use sqlx::SqlitePool;

#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait TokenRepository: Send + Sync {
    async fn create_token(
        &self,
        user_id: i64,
        token_hash: &str,
        expires_at: &str,
    ) -> RepositoryResult<PasswordResetToken>;

    async fn find_by_hash(&self, token_hash: &str)
        -> RepositoryResult<Option<PasswordResetToken>>;

    async fn mark_used(&self, id: i64, used_at: &str) -> RepositoryResult<()>;

    /// Set the user's new password hash and consume the token as one
    /// transaction, so a reset token can never be replayed against a
    /// half-applied update.
    async fn consume_and_update_password(
        &self,
        token_id: i64,
        user_id: i64,
        password_hash: &str,
        used_at: &str,
    ) -> RepositoryResult<()>;
}

pub struct SqliteTokenRepository {
    pool: SqlitePool,
}

impl SqliteTokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for SqliteTokenRepository {
    async fn create_token(
        &self,
        user_id: i64,
        token_hash: &str,
        expires_at: &str,
    ) -> RepositoryResult<PasswordResetToken> {
        let result = sqlx::query(
            "INSERT INTO password_reset_tokens (user_id, token_hash, expires_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        let token = sqlx::query_as::<_, PasswordResetToken>(
            "SELECT id, user_id, token_hash, expires_at, used_at, created_at \
             FROM password_reset_tokens WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(token)
    }

    async fn find_by_hash(
        &self,
        token_hash: &str,
    ) -> RepositoryResult<Option<PasswordResetToken>> {
        let token = sqlx::query_as::<_, PasswordResetToken>(
            "SELECT id, user_id, token_hash, expires_at, used_at, created_at \
             FROM password_reset_tokens WHERE token_hash = ?",
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await?;

        Ok(token)
    }

    async fn mark_used(&self, id: i64, used_at: &str) -> RepositoryResult<()> {
        let result = sqlx::query(
            "UPDATE password_reset_tokens SET used_at = ? WHERE id = ? AND used_at IS NULL",
        )
        .bind(used_at)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn consume_and_update_password(
        &self,
        token_id: i64,
        user_id: i64,
        password_hash: &str,
        used_at: &str,
    ) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(RepositoryError::NotFound);
        }

        // The used_at IS NULL guard makes consumption single-shot even
        // if two resets race on the same token.
        let consumed = sqlx::query(
            "UPDATE password_reset_tokens SET used_at = ? WHERE id = ? AND used_at IS NULL",
        )
        .bind(used_at)
        .bind(token_id)
        .execute(&mut *tx)
        .await?;

        if consumed.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}
