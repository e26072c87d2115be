//! Team registry service

use std::sync::Arc;

use tracing::info;

use crate::domain::participant::ParticipantId;
use crate::domain::team::{Team, TeamId, TeamRepository, TeamStatus};
use crate::domain::DomainError;
use crate::infrastructure::keygen::KeyGenerator;

/// Attempts at generating a non-colliding team code before giving up
const CODE_RETRY_LIMIT: usize = 5;

/// Request for creating a team directly (ops escape hatch)
#[derive(Debug, Clone)]
pub struct CreateTeamRequest {
    pub name: String,
    /// Explicit code; generated when absent
    pub code: Option<String>,
    pub leader: ParticipantId,
    /// Additional members beyond the leader
    pub members: Vec<ParticipantId>,
}

/// Request for updating a team
#[derive(Debug, Clone, Default)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
    pub status: Option<String>,
}

/// Aggregate team counts grouped by status
#[derive(Debug, Clone)]
pub struct TeamStats {
    pub by_status: Vec<(TeamStatus, usize)>,
    pub total: usize,
}

/// Registry owning team creation, capacity checks and membership mutation
#[derive(Debug)]
pub struct TeamService {
    repository: Arc<dyn TeamRepository>,
    keygen: KeyGenerator,
}

impl TeamService {
    pub fn new(repository: Arc<dyn TeamRepository>) -> Self {
        Self {
            repository,
            keygen: KeyGenerator::new(),
        }
    }

    /// Parse a client-supplied status filter, case-insensitively
    pub fn parse_status(status: &str) -> Result<TeamStatus, DomainError> {
        TeamStatus::parse_ci(status)
            .ok_or_else(|| DomainError::validation("Invalid status filter"))
    }

    /// Resolve a join code to a team with free capacity
    ///
    /// The join-intent pre-check. The second enforcement layer lives in the
    /// repository's atomic `add_member`.
    pub async fn validate_code_for_join(&self, code: &str) -> Result<Team, DomainError> {
        let team = self
            .repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| DomainError::not_found("Invalid team code"))?;

        if team.is_full() {
            return Err(DomainError::capacity("Team is already full (max 4 members)"));
        }

        Ok(team)
    }

    /// Create a team for a freshly verified leader, generating its code
    pub async fn create_for_leader(
        &self,
        name: &str,
        leader: &ParticipantId,
    ) -> Result<Team, DomainError> {
        if self.repository.find_by_name(name).await?.is_some() {
            return Err(DomainError::conflict("Team name already exists"));
        }

        let mut last_err = DomainError::internal("Team code generation failed");

        for _ in 0..CODE_RETRY_LIMIT {
            let code = self.keygen.team_code();
            let team = Team::new(TeamId::generate(), name, &code, leader.clone())
                .map_err(|e| DomainError::validation(e.to_string()))?;

            match self.repository.create(team).await {
                Ok(team) => {
                    info!(team = %team.name(), code = %team.code(), "Team created");
                    return Ok(team);
                }
                // After the name pre-check a conflict is a code collision
                // (or a concurrent create raced us on the name); try a
                // fresh code.
                Err(e @ DomainError::Conflict { .. }) => last_err = e,
                Err(e) => return Err(e),
            }
        }

        Err(last_err)
    }

    /// Create a team with explicit fields (POST /api/teams)
    pub async fn create(&self, request: CreateTeamRequest) -> Result<Team, DomainError> {
        let code = match request.code {
            Some(code) => code,
            None => self.keygen.team_code(),
        };

        let mut team = Team::new(TeamId::generate(), &request.name, &code, request.leader)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        for member in request.members {
            team.add_member(member).map_err(|_| {
                DomainError::capacity("This team has reached the maximum capacity of 4 members")
            })?;
        }

        self.repository.create(team).await
    }

    /// Atomically add a member, surfacing Capacity on a full team
    pub async fn add_member(
        &self,
        id: &TeamId,
        participant: &ParticipantId,
    ) -> Result<Team, DomainError> {
        self.repository.add_member(id, participant).await
    }

    /// Remove a member; no-op if absent
    pub async fn remove_member(
        &self,
        id: &TeamId,
        participant: &ParticipantId,
    ) -> Result<Team, DomainError> {
        self.repository.remove_member(id, participant).await
    }

    pub async fn get(&self, id: &TeamId) -> Result<Team, DomainError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Team not found"))
    }

    pub async fn get_by_code(&self, code: &str) -> Result<Team, DomainError> {
        self.repository
            .find_by_code(code)
            .await?
            .ok_or_else(|| DomainError::not_found("Team not found with the provided code"))
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Team>, DomainError> {
        self.repository.find_by_name(name).await
    }

    /// List teams, optionally filtered by a client-supplied status string
    pub async fn list(&self, status: Option<&str>) -> Result<Vec<Team>, DomainError> {
        let status = status.map(Self::parse_status).transpose()?;
        self.repository.list(status).await
    }

    pub async fn set_status(&self, id: &TeamId, status: TeamStatus) -> Result<Team, DomainError> {
        let mut team = self.get(id).await?;
        team.set_status(status);
        self.repository.update(&team).await
    }

    /// Patch name and/or status
    pub async fn update(&self, id: &TeamId, request: UpdateTeamRequest) -> Result<Team, DomainError> {
        let mut team = self.get(id).await?;

        if let Some(name) = request.name {
            team.set_name(&name)
                .map_err(|e| DomainError::validation(e.to_string()))?;
        }

        if let Some(status) = request.status {
            team.set_status(Self::parse_status(&status)?);
        }

        self.repository.update(&team).await
    }

    /// Per-status counts plus the total
    pub async fn stats(&self) -> Result<TeamStats, DomainError> {
        let by_status = self.repository.count_by_status().await?;
        let total = by_status.iter().map(|(_, n)| n).sum();

        Ok(TeamStats { by_status, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::team::repository::InMemoryTeamRepository;

    fn service() -> TeamService {
        TeamService::new(Arc::new(InMemoryTeamRepository::new()))
    }

    #[tokio::test]
    async fn test_create_for_leader() {
        let service = service();
        let leader = ParticipantId::new("leader-1");

        let team = service.create_for_leader("Alpha", &leader).await.unwrap();

        assert_eq!(team.name(), "Alpha");
        assert_eq!(team.code().len(), 6);
        assert_eq!(team.member_count(), 1);
        assert_eq!(team.leader(), &leader);
        assert_eq!(team.status(), TeamStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_for_leader_duplicate_name() {
        let service = service();

        service
            .create_for_leader("Alpha", &ParticipantId::new("p1"))
            .await
            .unwrap();

        let result = service
            .create_for_leader("Alpha", &ParticipantId::new("p2"))
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_validate_code_unknown() {
        let service = service();

        let result = service.validate_code_for_join("NOPE00").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_validate_code_full_team() {
        let service = service();
        let team = service
            .create_for_leader("Alpha", &ParticipantId::new("p1"))
            .await
            .unwrap();

        for i in 2..=4 {
            service
                .add_member(team.id(), &ParticipantId::new(format!("p{}", i)))
                .await
                .unwrap();
        }

        let result = service.validate_code_for_join(team.code()).await;
        assert!(matches!(result, Err(DomainError::Capacity { .. })));
    }

    #[tokio::test]
    async fn test_validate_code_with_room() {
        let service = service();
        let team = service
            .create_for_leader("Alpha", &ParticipantId::new("p1"))
            .await
            .unwrap();

        let found = service.validate_code_for_join(team.code()).await.unwrap();
        assert_eq!(found.id(), team.id());
    }

    #[tokio::test]
    async fn test_create_with_explicit_code() {
        let service = service();

        let team = service
            .create(CreateTeamRequest {
                name: "Alpha".to_string(),
                code: Some("AAA111".to_string()),
                leader: ParticipantId::new("p1"),
                members: vec![ParticipantId::new("p2")],
            })
            .await
            .unwrap();

        assert_eq!(team.code(), "AAA111");
        assert_eq!(team.member_count(), 2);
    }

    #[tokio::test]
    async fn test_create_too_many_members() {
        let service = service();

        let result = service
            .create(CreateTeamRequest {
                name: "Alpha".to_string(),
                code: None,
                leader: ParticipantId::new("p1"),
                members: (2..=6).map(|i| ParticipantId::new(format!("p{}", i))).collect(),
            })
            .await;

        assert!(matches!(result, Err(DomainError::Capacity { .. })));
    }

    #[tokio::test]
    async fn test_parse_status() {
        assert_eq!(
            TeamService::parse_status("accepted").unwrap(),
            TeamStatus::Accepted
        );
        assert!(TeamService::parse_status("bogus").is_err());
    }

    #[tokio::test]
    async fn test_update_status_case_insensitive() {
        let service = service();
        let team = service
            .create_for_leader("Alpha", &ParticipantId::new("p1"))
            .await
            .unwrap();

        let updated = service
            .update(
                team.id(),
                UpdateTeamRequest {
                    name: None,
                    status: Some("ACCEPTED".to_string()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.status(), TeamStatus::Accepted);
    }

    #[tokio::test]
    async fn test_stats() {
        let service = service();
        let team = service
            .create_for_leader("Alpha", &ParticipantId::new("p1"))
            .await
            .unwrap();
        service
            .create_for_leader("Beta", &ParticipantId::new("p2"))
            .await
            .unwrap();
        service.set_status(team.id(), TeamStatus::Accepted).await.unwrap();

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.total, 2);

        let accepted = stats
            .by_status
            .iter()
            .find(|(s, _)| *s == TeamStatus::Accepted)
            .map(|(_, n)| *n);
        assert_eq!(accepted, Some(1));
    }
}
