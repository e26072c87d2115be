//! Random token and team code generation
//!
//! Pure random-string producers. Uniqueness of team codes is not guaranteed
//! here; callers retry when the store rejects a collision.

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, RngCore};

use crate::domain::team::TEAM_CODE_LENGTH;

/// Validity window for email verification tokens
pub const VERIFICATION_TOKEN_TTL_HOURS: i64 = 24;

const TOKEN_BYTES: usize = 20;
const TEAM_CODE_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A freshly generated verification token with its expiry
#[derive(Debug, Clone)]
pub struct GeneratedToken {
    /// Opaque hex token (40 hex chars)
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Generator for verification tokens and team join codes
#[derive(Debug, Clone, Default)]
pub struct KeyGenerator;

impl KeyGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generate a cryptographically random single-use verification token
    pub fn verification_token(&self) -> GeneratedToken {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);

        GeneratedToken {
            token: hex::encode(bytes),
            expires_at: Utc::now() + Duration::hours(VERIFICATION_TOKEN_TTL_HOURS),
        }
    }

    /// Generate a 6-character uppercase alphanumeric team code
    pub fn team_code(&self) -> String {
        let mut rng = rand::thread_rng();

        (0..TEAM_CODE_LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..TEAM_CODE_CHARSET.len());
                TEAM_CODE_CHARSET[idx] as char
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::team::validate_team_code;

    #[test]
    fn test_verification_token_shape() {
        let generated = KeyGenerator::new().verification_token();

        assert_eq!(generated.token.len(), 40);
        assert!(generated.token.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(generated.expires_at > Utc::now() + Duration::hours(23));
        assert!(generated.expires_at <= Utc::now() + Duration::hours(24));
    }

    #[test]
    fn test_verification_tokens_are_unique() {
        let generator = KeyGenerator::new();
        let a = generator.verification_token();
        let b = generator.verification_token();

        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_team_code_shape() {
        let generator = KeyGenerator::new();

        for _ in 0..50 {
            let code = generator.team_code();
            assert!(validate_team_code(&code).is_ok(), "bad code: {}", code);
        }
    }

    #[test]
    fn test_team_codes_vary() {
        let generator = KeyGenerator::new();
        let codes: std::collections::HashSet<String> =
            (0..20).map(|_| generator.team_code()).collect();

        // 36^6 possibilities; 20 draws colliding down to 1 would mean a broken RNG
        assert!(codes.len() > 1);
    }
}
