use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Capacity error: {message}")]
    Capacity { message: String },

    #[error("Authentication error: {message}")]
    Auth { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn capacity(message: impl Into<String>) -> Self {
        Self::Capacity {
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let error = DomainError::not_found("Participant 'abc' not found");
        assert_eq!(error.to_string(), "Not found: Participant 'abc' not found");
    }

    #[test]
    fn test_capacity_error() {
        let error = DomainError::capacity("Team is already full (max 4 members)");
        assert_eq!(
            error.to_string(),
            "Capacity error: Team is already full (max 4 members)"
        );
    }

    #[test]
    fn test_conflict_error() {
        let error = DomainError::conflict("Email already exists");
        assert_eq!(error.to_string(), "Conflict: Email already exists");
    }

    #[test]
    fn test_auth_error() {
        let error = DomainError::auth("Invalid credentials");
        assert_eq!(error.to_string(), "Authentication error: Invalid credentials");
    }
}
