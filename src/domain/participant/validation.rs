//! Participant field validation

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during participant validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParticipantValidationError {
    #[error("Full name is required")]
    EmptyFullName,

    #[error("Full name cannot exceed {0} characters")]
    FullNameTooLong(usize),

    #[error("Please provide a valid email")]
    InvalidEmail,

    #[error("Phone number is required")]
    EmptyPhone,

    #[error("Wilaya is required")]
    EmptyWilaya,

    #[error("Team name is required")]
    EmptyTeamName,
}

const MAX_FULL_NAME_LENGTH: usize = 100;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("valid email regex")
});

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), ParticipantValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ParticipantValidationError::InvalidEmail)
    }
}

/// Validate a participant's full name
pub fn validate_full_name(name: &str) -> Result<(), ParticipantValidationError> {
    if name.trim().is_empty() {
        return Err(ParticipantValidationError::EmptyFullName);
    }

    if name.len() > MAX_FULL_NAME_LENGTH {
        return Err(ParticipantValidationError::FullNameTooLong(
            MAX_FULL_NAME_LENGTH,
        ));
    }

    Ok(())
}

/// Validate a phone number (presence only; formats vary by carrier)
pub fn validate_phone(phone: &str) -> Result<(), ParticipantValidationError> {
    if phone.trim().is_empty() {
        return Err(ParticipantValidationError::EmptyPhone);
    }

    Ok(())
}

/// Validate the wilaya (region) field
pub fn validate_wilaya(wilaya: &str) -> Result<(), ParticipantValidationError> {
    if wilaya.trim().is_empty() {
        return Err(ParticipantValidationError::EmptyWilaya);
    }

    Ok(())
}

/// Validate the display team name carried on the participant
pub fn validate_team_name(team_name: &str) -> Result<(), ParticipantValidationError> {
    if team_name.trim().is_empty() {
        return Err(ParticipantValidationError::EmptyTeamName);
    }

    Ok(())
}
