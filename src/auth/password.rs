//! Password hashing with salted Argon2id

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::error::{RapierError, Result};

/// Hashes a plaintext password with a fresh random salt.
///
/// Two calls with the same input yield different PHC strings; both verify.
pub fn hash_password(plaintext: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| RapierError::AuthError(format!("Failed to hash password: {}", e)))
}

/// Checks a plaintext password against a stored PHC hash.
///
/// The digest comparison inside `argon2` is constant-time. A malformed
/// stored hash is treated as a mismatch.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::error!("Stored password hash could not be parsed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_not_plaintext() {
        let hash = hash_password("testpassword123").unwrap();
        assert_ne!(hash, "testpassword123");
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_same_password_different_salts() {
        let first = hash_password("testpassword123").unwrap();
        let second = hash_password("testpassword123").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("testpassword123", &first));
        assert!(verify_password("testpassword123", &second));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hash = hash_password("testpassword123").unwrap();
        assert!(!verify_password("wrongpassword", &hash));
        assert!(!verify_password("", &hash));
    }

    #[test]
    fn test_malformed_hash_rejected() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
