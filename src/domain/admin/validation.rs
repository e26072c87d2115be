//! Admin account validation

use thiserror::Error;

/// Errors that can occur during admin validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AdminValidationError {
    #[error("Username must be at least {0} characters")]
    UsernameTooShort(usize),

    #[error("Username cannot exceed {0} characters")]
    UsernameTooLong(usize),

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
}

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 50;
const MIN_PASSWORD_LENGTH: usize = 8;

/// Validate an admin username
pub fn validate_username(username: &str) -> Result<(), AdminValidationError> {
    let trimmed = username.trim();

    if trimmed.len() < MIN_USERNAME_LENGTH {
        return Err(AdminValidationError::UsernameTooShort(MIN_USERNAME_LENGTH));
    }

    if trimmed.len() > MAX_USERNAME_LENGTH {
        return Err(AdminValidationError::UsernameTooLong(MAX_USERNAME_LENGTH));
    }

    Ok(())
}

/// Validate an admin password (length only; hashing happens elsewhere)
pub fn validate_password(password: &str) -> Result<(), AdminValidationError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AdminValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_username() {
        assert!(validate_username("admin").is_ok());
        assert!(validate_username("ops-team").is_ok());
    }

    #[test]
    fn test_username_too_short() {
        assert_eq!(
            validate_username("ab"),
            Err(AdminValidationError::UsernameTooShort(3))
        );
    }

    #[test]
    fn test_username_too_long() {
        assert_eq!(
            validate_username(&"a".repeat(51)),
            Err(AdminValidationError::UsernameTooLong(50))
        );
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("secure-password").is_ok());
        assert_eq!(
            validate_password("short"),
            Err(AdminValidationError::PasswordTooShort(8))
        );
    }
}
