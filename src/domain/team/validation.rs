//! Team validation

use thiserror::Error;

/// Errors that can occur during team validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeamValidationError {
    #[error("Team name cannot be empty")]
    EmptyName,

    #[error("Team name cannot exceed {0} characters")]
    NameTooLong(usize),

    #[error("Team code must be exactly {0} characters")]
    InvalidCodeLength(usize),

    #[error("Team code can only contain uppercase letters and digits")]
    InvalidCodeCharacters,
}

const MAX_TEAM_NAME_LENGTH: usize = 100;

/// Length of every team code
pub const TEAM_CODE_LENGTH: usize = 6;

/// Validate a team display name
pub fn validate_team_name(name: &str) -> Result<(), TeamValidationError> {
    if name.trim().is_empty() {
        return Err(TeamValidationError::EmptyName);
    }

    if name.len() > MAX_TEAM_NAME_LENGTH {
        return Err(TeamValidationError::NameTooLong(MAX_TEAM_NAME_LENGTH));
    }

    Ok(())
}

/// Validate a 6-character uppercase alphanumeric team code
pub fn validate_team_code(code: &str) -> Result<(), TeamValidationError> {
    if code.len() != TEAM_CODE_LENGTH {
        return Err(TeamValidationError::InvalidCodeLength(TEAM_CODE_LENGTH));
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err(TeamValidationError::InvalidCodeCharacters);
    }

    Ok(())
}
