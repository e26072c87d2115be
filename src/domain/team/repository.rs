//! Team repository trait

use async_trait::async_trait;

use super::entity::{Team, TeamId, TeamStatus};
use crate::domain::participant::ParticipantId;
use crate::domain::DomainError;

/// Repository for teams
///
/// Name and code behave like unique indexes: violations surface as
/// `DomainError::Conflict`. Membership mutation is atomic with respect to
/// other mutators of the same team - the capacity re-check and the write
/// happen in one step (a lock-held section in memory, a conditional UPDATE
/// in Postgres), which is what closes the concurrent double-join race.
#[async_trait]
pub trait TeamRepository: Send + Sync + std::fmt::Debug {
    /// Get a team by ID
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError>;

    /// Find a team by its join code
    async fn find_by_code(&self, code: &str) -> Result<Option<Team>, DomainError>;

    /// Find a team by display name
    async fn find_by_name(&self, name: &str) -> Result<Option<Team>, DomainError>;

    /// Create a new team, Conflict on duplicate name or code
    async fn create(&self, team: Team) -> Result<Team, DomainError>;

    /// Update a team's mutable fields (name, status), Conflict on name collision
    async fn update(&self, team: &Team) -> Result<Team, DomainError>;

    /// List teams, newest first, optionally filtered by status
    async fn list(&self, status: Option<TeamStatus>) -> Result<Vec<Team>, DomainError>;

    /// Count teams grouped by status
    async fn count_by_status(&self) -> Result<Vec<(TeamStatus, usize)>, DomainError>;

    /// Atomically append a member, re-checking capacity at the write
    ///
    /// Idempotent: adding an existing member returns the team unchanged.
    /// Returns Capacity when the membership is already at MAX_TEAM_SIZE.
    async fn add_member(
        &self,
        id: &TeamId,
        participant: &ParticipantId,
    ) -> Result<Team, DomainError>;

    /// Remove a member by identity; no-op if absent
    async fn remove_member(
        &self,
        id: &TeamId,
        participant: &ParticipantId,
    ) -> Result<Team, DomainError>;
}
