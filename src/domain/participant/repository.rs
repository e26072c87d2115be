//! Participant repository trait

use async_trait::async_trait;

use super::entity::{AttendanceStatus, Participant, ParticipantId};
use crate::domain::DomainError;

/// Repository for participant records
///
/// Implementations enforce email uniqueness at create/update time the way a
/// unique index would, surfacing violations as `DomainError::Conflict`.
#[async_trait]
pub trait ParticipantRepository: Send + Sync + std::fmt::Debug {
    /// Get a participant by ID
    async fn get(&self, id: &ParticipantId) -> Result<Option<Participant>, DomainError>;

    /// Find a participant by email (exact, case-insensitive)
    async fn find_by_email(&self, email: &str) -> Result<Option<Participant>, DomainError>;

    /// Find the participant holding the given verification token
    async fn find_by_token(&self, token: &str) -> Result<Option<Participant>, DomainError>;

    /// Create a new participant, Conflict on duplicate email
    async fn create(&self, participant: Participant) -> Result<Participant, DomainError>;

    /// Update an existing participant, Conflict if the email collides
    async fn update(&self, participant: &Participant) -> Result<Participant, DomainError>;

    /// List all participants, newest first
    async fn list(&self) -> Result<Vec<Participant>, DomainError>;

    /// List a page of participants, newest first
    async fn list_page(&self, offset: usize, limit: usize)
        -> Result<Vec<Participant>, DomainError>;

    /// Total number of participants
    async fn count(&self) -> Result<usize, DomainError>;

    /// Case-insensitive substring search on the full name
    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Participant>, DomainError>;

    /// List participants with the given attendance status
    async fn list_by_attendance(
        &self,
        status: AttendanceStatus,
    ) -> Result<Vec<Participant>, DomainError>;
}
