//! Admin entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_username, AdminValidationError};
use crate::domain::participant::validation::{validate_email, ParticipantValidationError};

/// Admin identifier - a UUID assigned at signup time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdminId(String);

impl AdminId {
    /// Wrap an existing identifier (e.g. read back from storage)
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AdminId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from constructing an admin
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdminEntityError {
    #[error(transparent)]
    Username(#[from] AdminValidationError),

    #[error(transparent)]
    Email(#[from] ParticipantValidationError),
}

/// Admin account used solely for authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    id: AdminId,
    /// Unique username
    username: String,
    /// Unique email, stored lowercase
    email: String,
    /// Argon2 hash - never exposed in serialization
    #[serde(default, skip_serializing)]
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Admin {
    /// Create a new admin with an already-hashed password
    pub fn new(
        id: AdminId,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<Self, AdminEntityError> {
        let username = username.into();
        let email = email.into().to_lowercase();
        validate_username(&username)?;
        validate_email(&email)?;

        let now = Utc::now();

        Ok(Self {
            id,
            username: username.trim().to_string(),
            email,
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild an admin from stored state; used by repository implementations
    pub fn restore(
        id: AdminId,
        username: String,
        email: String,
        password_hash: String,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &AdminId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Replace the stored password hash (reset flow)
    pub fn set_password_hash(&mut self, hash: impl Into<String>) {
        self.password_hash = hash.into();
        self.updated_at = Utc::now();
    }
}
