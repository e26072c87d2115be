//! Participant domain - entity, validation and repository trait

pub mod entity;
pub mod repository;
pub mod validation;

pub use entity::{
    AttendanceStatus, ExperienceLevel, NewParticipant, Participant, ParticipantId, ShirtSize,
    StoredParticipant,
};
pub use repository::ParticipantRepository;
pub use validation::{
    validate_email, validate_full_name, validate_phone, validate_team_name, validate_wilaya,
    ParticipantValidationError,
};

#[cfg(test)]
pub(crate) use entity::test_new_participant;
