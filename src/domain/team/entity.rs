//! Team entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_team_code, validate_team_name, TeamValidationError};
use crate::domain::participant::ParticipantId;

/// Maximum number of participants per team, leader included
pub const MAX_TEAM_SIZE: usize = 4;

/// Team identifier - a UUID assigned at creation time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamId(String);

impl TeamId {
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

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review status of a team; drives bulk email targeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TeamStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl TeamStatus {
    /// Parse a status filter string case-insensitively
    pub fn parse_ci(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

impl std::fmt::Display for TeamStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Accepted => write!(f, "Accepted"),
            Self::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Team entity
///
/// Owns the authoritative membership list. The participant records carry a
/// denormalized `team_code` back-reference that the registration workflow
/// keeps in sync with this list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    /// Unique display name
    name: String,
    /// Unique 6-character uppercase alphanumeric join code
    code: String,
    /// The participant who created the team
    leader: ParticipantId,
    /// Membership set, leader included; never exceeds MAX_TEAM_SIZE
    members: Vec<ParticipantId>,
    status: TeamStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team with the leader as its sole member
    pub fn new(
        id: TeamId,
        name: impl Into<String>,
        code: impl Into<String>,
        leader: ParticipantId,
    ) -> Result<Self, TeamValidationError> {
        let name = name.into();
        let code = code.into();
        validate_team_name(&name)?;
        validate_team_code(&code)?;

        let now = Utc::now();

        Ok(Self {
            id,
            name,
            code,
            members: vec![leader.clone()],
            leader,
            status: TeamStatus::Pending,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a team from stored state; used by repository implementations
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: TeamId,
        name: String,
        code: String,
        leader: ParticipantId,
        members: Vec<ParticipantId>,
        status: TeamStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            code,
            leader,
            members,
            status,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &TeamId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn leader(&self) -> &ParticipantId {
        &self.leader
    }

    pub fn members(&self) -> &[ParticipantId] {
        &self.members
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn status(&self) -> TeamStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn contains(&self, participant: &ParticipantId) -> bool {
        self.members.contains(participant)
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= MAX_TEAM_SIZE
    }

    // Mutators

    /// Append a member if absent; the pre-save capacity guard
    ///
    /// Returns Ok(true) when appended, Ok(false) when already a member, and
    /// Err(()) when the team is at capacity. Repositories call this inside
    /// their critical section so the check and the write are one step.
    pub fn add_member(&mut self, participant: ParticipantId) -> Result<bool, ()> {
        if self.members.contains(&participant) {
            return Ok(false);
        }

        if self.is_full() {
            return Err(());
        }

        self.members.push(participant);
        self.touch();
        Ok(true)
    }

    /// Remove a member by identity; no-op if absent
    pub fn remove_member(&mut self, participant: &ParticipantId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != participant);

        if self.members.len() != before {
            self.touch();
            true
        } else {
            false
        }
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), TeamValidationError> {
        let name = name.into();
        validate_team_name(&name)?;
        self.name = name;
        self.touch();
        Ok(())
    }

    pub fn set_status(&mut self, status: TeamStatus) {
        self.status = status;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_team() -> Team {
        Team::new(
            TeamId::generate(),
            "Alpha",
            "ABC123",
            ParticipantId::new("leader-1"),
        )
        .unwrap()
    }

    #[test]
    fn test_team_creation() {
        let team = make_team();

        assert_eq!(team.name(), "Alpha");
        assert_eq!(team.code(), "ABC123");
        assert_eq!(team.member_count(), 1);
        assert!(team.contains(&ParticipantId::new("leader-1")));
        assert_eq!(team.status(), TeamStatus::Pending);
    }

    #[test]
    fn test_team_invalid_code() {
        let result = Team::new(
            TeamId::generate(),
            "Alpha",
            "abc",
            ParticipantId::new("leader-1"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_add_member_idempotent() {
        let mut team = make_team();

        assert_eq!(team.add_member(ParticipantId::new("p2")), Ok(true));
        assert_eq!(team.add_member(ParticipantId::new("p2")), Ok(false));
        assert_eq!(team.member_count(), 2);
    }

    #[test]
    fn test_add_member_capacity_guard() {
        let mut team = make_team();

        team.add_member(ParticipantId::new("p2")).unwrap();
        team.add_member(ParticipantId::new("p3")).unwrap();
        team.add_member(ParticipantId::new("p4")).unwrap();

        assert!(team.is_full());
        assert_eq!(team.add_member(ParticipantId::new("p5")), Err(()));
        assert_eq!(team.member_count(), MAX_TEAM_SIZE);
    }

    #[test]
    fn test_remove_member() {
        let mut team = make_team();
        team.add_member(ParticipantId::new("p2")).unwrap();

        assert!(team.remove_member(&ParticipantId::new("p2")));
        assert!(!team.remove_member(&ParticipantId::new("p2")));
        assert_eq!(team.member_count(), 1);
    }

    #[test]
    fn test_status_parse_ci() {
        assert_eq!(TeamStatus::parse_ci("accepted"), Some(TeamStatus::Accepted));
        assert_eq!(TeamStatus::parse_ci("PENDING"), Some(TeamStatus::Pending));
        assert_eq!(TeamStatus::parse_ci("Rejected"), Some(TeamStatus::Rejected));
        assert_eq!(TeamStatus::parse_ci("unknown"), None);
    }

    #[test]
    fn test_status_display_round_trip() {
        for status in [TeamStatus::Pending, TeamStatus::Accepted, TeamStatus::Rejected] {
            assert_eq!(TeamStatus::parse_ci(&status.to_string()), Some(status));
        }
    }
}
