use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString},
    Argon2, PasswordVerifier,
};

#[derive(Debug, thiserror::Error)]
#[error("Password hashing failed: {0}")]
pub struct HashError(String);

/// One-way salted hash of a plaintext password. The PHC output string
/// embeds the salt and cost parameters, so `verify` needs no other
/// state.
pub fn hash(plaintext: &str) -> Result<String, HashError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| HashError(e.to_string()))
}

pub fn verify(plaintext: &str, password_hash: &str) -> bool {
    if let Ok(parsed_hash) = PasswordHash::new(password_hash) {
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_round_trip() {
        let hashed = hash("Secret123!").unwrap();
        assert!(verify("Secret123!", &hashed));
        assert!(!verify("secret123!", &hashed));
        assert!(!verify("", &hashed));
    }

    #[test]
    fn test_hashes_are_salted_per_call() {
        let first = hash("Secret123!").unwrap();
        let second = hash("Secret123!").unwrap();
        assert_ne!(first, second);
        assert!(verify("Secret123!", &first));
        assert!(verify("Secret123!", &second));
    }

    #[test]
    fn test_verify_rejects_garbage_hash() {
        assert!(!verify("Secret123!", "not-a-phc-string"));
    }
}
