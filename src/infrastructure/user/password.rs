//! Password hashing utilities using Argon2

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher as Argon2PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Salted one-way password hashing
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a password with a fresh random salt
    fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Verify a password against a stored hash; malformed hashes never match
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2-based password hasher
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Failed to hash password: {}", e)))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = Argon2Hasher::new();

        let hash = hasher.hash("1205").unwrap();

        assert!(hasher.verify("1205", &hash));
        assert!(!hasher.verify("1205!", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let hasher = Argon2Hasher::new();

        let hash1 = hasher.hash("1205").unwrap();
        let hash2 = hasher.hash("1205").unwrap();

        assert_ne!(hash1, hash2);
        assert!(hasher.verify("1205", &hash1));
        assert!(hasher.verify("1205", &hash2));
    }

    #[test]
    fn test_hash_does_not_contain_password() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("plain-text-secret").unwrap();

        assert!(!hash.contains("plain-text-secret"));
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = Argon2Hasher::new();

        assert!(!hasher.verify("1205", "invalid_hash_format"));
        assert!(!hasher.verify("1205", ""));
    }

    #[test]
    fn test_hash_used_as_password_does_not_verify() {
        let hasher = Argon2Hasher::new();
        let hash = hasher.hash("1205").unwrap();

        assert!(!hasher.verify(&hash, &hash));
    }
}
