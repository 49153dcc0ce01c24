use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single-use, time-limited password reset token record.
///
/// `token_hash` is the hex sha256 digest of the raw token; the raw
/// value is only ever delivered by email. Timestamps are RFC 3339
/// strings as written by the service layer.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PasswordResetToken {
    pub id: i64,
    pub user_id: i64,
    #[serde(skip_serializing)]
    pub token_hash: String,
    pub expires_at: String,
    pub used_at: Option<String>,
    pub created_at: Option<String>,
}

impl PasswordResetToken {
    /// A token is spendable only while unused and unexpired.
    pub fn is_valid(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        if self.used_at.is_some() {
            return false;
        }
        match chrono::DateTime::parse_from_rfc3339(&self.expires_at) {
            Ok(expires_at) => now < expires_at,
            Err(_) => false,
        }
    }
}
