//! Password hashing behind a trait so tests can swap in a cheap hasher

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordVerifier, SaltString},
    Argon2,
};
use std::fmt::Debug;

use crate::domain::DomainError;

/// Trait for slow adaptive password hashing
pub trait PasswordHasher: Send + Sync + Debug {
    /// Hash a plaintext password for storage
    fn hash_password(&self, plain: &str) -> Result<String, DomainError>;

    /// Verify a plaintext password against a stored hash
    fn verify_password(&self, plain: &str, hash: &str) -> bool;
}

/// Argon2id hasher with default parameters
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash_password(&self, plain: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);

        argon2::PasswordHasher::hash_password(&Argon2::default(), plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DomainError::internal(format!("Password hashing failed: {}", e)))
    }

    fn verify_password(&self, plain: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash_password("hunter2hunter2").unwrap();

        assert!(hasher.verify_password("hunter2hunter2", &hash));
        assert!(!hasher.verify_password("wrong", &hash));
    }

    #[test]
    fn test_salted_hashes_differ() {
        let hasher = Argon2PasswordHasher::new();
        let a = hasher.hash_password("same-password").unwrap();
        let b = hasher.hash_password("same-password").unwrap();

        assert_ne!(a, b);
        assert!(hasher.verify_password("same-password", &a));
        assert!(hasher.verify_password("same-password", &b));
    }

    #[test]
    fn test_verify_garbage_hash() {
        let hasher = Argon2PasswordHasher::new();
        assert!(!hasher.verify_password("password", "not-a-phc-string"));
    }
}
