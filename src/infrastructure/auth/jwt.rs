//! JWT issuance and verification for the admin flows
//!
//! Two token kinds share one signing secret: session tokens (1 day) issued
//! at login, and purpose-tagged password-reset tokens (15 minutes) bound to
//! the admin id. The purpose claim keeps a reset token from being replayed
//! as a session.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::domain::admin::Admin;
use crate::domain::DomainError;

/// What a token authorizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenPurpose {
    Session,
    PasswordReset,
}

/// Claims carried by every token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin id
    pub sub: String,
    /// Admin email
    pub email: String,
    pub purpose: TokenPurpose,
    /// Issued at (Unix epoch)
    pub iat: i64,
    /// Expiration (Unix epoch)
    pub exp: i64,
}

/// Configuration for the token signer
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub session_ttl_hours: i64,
    pub reset_ttl_minutes: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Self::default()
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            session_ttl_hours: 24,
            reset_ttl_minutes: 15,
        }
    }
}

/// Trait for signing and verifying admin tokens
pub trait TokenSigner: Send + Sync + Debug {
    /// Issue a session token for a logged-in admin
    fn issue_session(&self, admin: &Admin) -> Result<String, DomainError>;

    /// Issue a short-lived password-reset token bound to the admin id
    fn issue_reset(&self, admin: &Admin) -> Result<String, DomainError>;

    /// Verify a token and check it was issued for the expected purpose
    fn verify(&self, token: &str, purpose: TokenPurpose) -> Result<Claims, DomainError>;
}

/// HS256 signer backed by a shared secret
#[derive(Clone)]
pub struct JwtSigner {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl Debug for JwtSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSigner")
            .field("session_ttl_hours", &self.config.session_ttl_hours)
            .field("reset_ttl_minutes", &self.config.reset_ttl_minutes)
            .field("secret", &"[hidden]")
            .finish()
    }
}

impl JwtSigner {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    fn issue(&self, admin: &Admin, purpose: TokenPurpose, ttl: Duration) -> Result<String, DomainError> {
        let now = Utc::now();
        let claims = Claims {
            sub: admin.id().as_str().to_string(),
            email: admin.email().to_string(),
            purpose,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign token: {}", e)))
    }
}

impl TokenSigner for JwtSigner {
    fn issue_session(&self, admin: &Admin) -> Result<String, DomainError> {
        self.issue(
            admin,
            TokenPurpose::Session,
            Duration::hours(self.config.session_ttl_hours),
        )
    }

    fn issue_reset(&self, admin: &Admin) -> Result<String, DomainError> {
        self.issue(
            admin,
            TokenPurpose::PasswordReset,
            Duration::minutes(self.config.reset_ttl_minutes),
        )
    }

    fn verify(&self, token: &str, purpose: TokenPurpose) -> Result<Claims, DomainError> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|_| DomainError::auth("Invalid or expired token"))?;

        if data.claims.purpose != purpose {
            return Err(DomainError::auth("Invalid or expired token"));
        }

        Ok(data.claims)
    }
}
