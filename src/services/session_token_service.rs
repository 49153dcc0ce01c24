use crate::config::security;
use crate::models::{Role, User};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const DEFAULT_TTL_MINUTES: i64 = 120;

#[derive(Debug, thiserror::Error)]
pub enum SessionTokenError {
    #[error("Failed to sign session token: {0}")]
    Signing(String),
    #[error("Invalid or expired session token")]
    Invalid,
}

/// Claims carried by the bearer token issued at login. The client may
/// mirror these into local state for UX gating, but the server only
/// trusts what it verifies here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: i64,
    pub email: String,
    pub role: Role,
    pub iat: usize,
    pub exp: usize,
}

pub struct SessionTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SessionTokenService {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    pub fn from_env() -> Self {
        let secret = security::load_token_secret();
        let ttl_minutes = std::env::var("SESSION_TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(DEFAULT_TTL_MINUTES);

        Self::new(&secret, Duration::minutes(ttl_minutes))
    }

    pub fn issue(&self, user: &User) -> Result<String, SessionTokenError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| SessionTokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionTokenError> {
        decode::<SessionClaims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| SessionTokenError::Invalid)
    }
}
