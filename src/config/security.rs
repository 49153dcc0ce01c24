use std::env;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha512};
use tracing::warn;

/// Loads the bearer-token signing secret from `TOKEN_SECRET`. Accepts
/// base64 or raw text; short secrets are stretched through SHA-512 so
/// the signing key is always 64 bytes. In development a missing secret
/// falls back to an ephemeral random key.
pub fn load_token_secret() -> Vec<u8> {
    match env::var("TOKEN_SECRET") {
        Ok(secret) if !secret.is_empty() => {
            let bytes = decode_secret_bytes(&secret);
            key_from_secret_bytes(&bytes)
        }
        _ => {
            warn!("TOKEN_SECRET not set; generating ephemeral key (development only)");
            ephemeral_key()
        }
    }
}

pub fn validate_production_config() {
    if current_environment() != "production" {
        return;
    }

    let secret = env::var("TOKEN_SECRET").expect("TOKEN_SECRET must be set in production");
    let decoded_secret = decode_secret_bytes(&secret);

    if decoded_secret.len() < 32 {
        panic!("FATAL: TOKEN_SECRET must be at least 32 bytes in production");
    }

    let lowered = secret.to_ascii_lowercase();
    if lowered.contains("example") || lowered.contains("changeme") || lowered.contains("default") {
        panic!("FATAL: TOKEN_SECRET appears to be a default value. Generate a secure secret!");
    }
}

fn current_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string())
}

fn decode_secret_bytes(secret: &str) -> Vec<u8> {
    STANDARD
        .decode(secret.as_bytes())
        .unwrap_or_else(|_| secret.as_bytes().to_vec())
}

fn key_from_secret_bytes(bytes: &[u8]) -> Vec<u8> {
    if bytes.len() >= 64 {
        bytes[..64].to_vec()
    } else {
        Sha512::digest(bytes).to_vec()
    }
}

fn ephemeral_key() -> Vec<u8> {
    use rand::RngCore;
    let mut key = vec![0u8; 64];
    rand::thread_rng().fill_bytes(&mut key);
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_is_stretched_to_64_bytes() {
        assert_eq!(key_from_secret_bytes(b"short").len(), 64);
    }

    #[test]
    fn test_long_secret_is_truncated_to_64_bytes() {
        let long = vec![7u8; 100];
        let key = key_from_secret_bytes(&long);
        assert_eq!(key.len(), 64);
        assert_eq!(&key[..], &long[..64]);
    }

    #[test]
    fn test_base64_secret_is_decoded() {
        let encoded = STANDARD.encode(b"binary-secret-material");
        assert_eq!(decode_secret_bytes(&encoded), b"binary-secret-material");
    }

    #[test]
    fn test_plain_secret_passes_through() {
        assert_eq!(decode_secret_bytes("not base64!!"), b"not base64!!");
    }
}
