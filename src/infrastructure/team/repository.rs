//! In-memory team repository

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::participant::ParticipantId;
use crate::domain::team::{Team, TeamId, TeamRepository, TeamStatus};
use crate::domain::DomainError;

/// Thread-safe in-memory team store
///
/// The write lock is the per-team serialization point: membership mutation
/// re-checks capacity while holding it, so concurrent joins cannot both pass
/// the check and both append.
#[derive(Debug, Default)]
pub struct InMemoryTeamRepository {
    teams: RwLock<HashMap<String, Team>>,
}

impl InMemoryTeamRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_err<T>(e: std::sync::PoisonError<T>) -> DomainError {
        DomainError::storage(format!("Failed to acquire team lock: {}", e))
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let teams = self.teams.read().map_err(Self::lock_err)?;
        Ok(teams.get(id.as_str()).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Team>, DomainError> {
        let teams = self.teams.read().map_err(Self::lock_err)?;
        Ok(teams.values().find(|t| t.code() == code).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Team>, DomainError> {
        let teams = self.teams.read().map_err(Self::lock_err)?;
        Ok(teams.values().find(|t| t.name() == name).cloned())
    }

    async fn create(&self, team: Team) -> Result<Team, DomainError> {
        let mut teams = self.teams.write().map_err(Self::lock_err)?;

        if teams.values().any(|t| t.name() == team.name()) {
            return Err(DomainError::conflict("Team name already exists"));
        }

        if teams.values().any(|t| t.code() == team.code()) {
            return Err(DomainError::conflict("Team code already exists"));
        }

        teams.insert(team.id().as_str().to_string(), team.clone());
        Ok(team)
    }

    async fn update(&self, team: &Team) -> Result<Team, DomainError> {
        let mut teams = self.teams.write().map_err(Self::lock_err)?;

        if !teams.contains_key(team.id().as_str()) {
            return Err(DomainError::not_found("Team not found"));
        }

        if teams
            .values()
            .any(|t| t.id() != team.id() && t.name() == team.name())
        {
            return Err(DomainError::conflict("Team name already exists"));
        }

        teams.insert(team.id().as_str().to_string(), team.clone());
        Ok(team.clone())
    }

    async fn list(&self, status: Option<TeamStatus>) -> Result<Vec<Team>, DomainError> {
        let teams = self.teams.read().map_err(Self::lock_err)?;

        let mut result: Vec<Team> = teams
            .values()
            .filter(|t| status.is_none_or(|s| t.status() == s))
            .cloned()
            .collect();

        result.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(result)
    }

    async fn count_by_status(&self) -> Result<Vec<(TeamStatus, usize)>, DomainError> {
        let teams = self.teams.read().map_err(Self::lock_err)?;

        let mut counts: HashMap<TeamStatus, usize> = HashMap::new();

        for team in teams.values() {
            *counts.entry(team.status()).or_default() += 1;
        }

        Ok(counts.into_iter().collect())
    }

    async fn add_member(
        &self,
        id: &TeamId,
        participant: &ParticipantId,
    ) -> Result<Team, DomainError> {
        let mut teams = self.teams.write().map_err(Self::lock_err)?;

        let team = teams
            .get_mut(id.as_str())
            .ok_or_else(|| DomainError::not_found("Team not found"))?;

        // Capacity re-checked under the write lock, atomically with the append
        match team.add_member(participant.clone()) {
            Ok(_) => Ok(team.clone()),
            Err(()) => Err(DomainError::capacity(
                "This team has reached the maximum capacity of 4 members",
            )),
        }
    }

    async fn remove_member(
        &self,
        id: &TeamId,
        participant: &ParticipantId,
    ) -> Result<Team, DomainError> {
        let mut teams = self.teams.write().map_err(Self::lock_err)?;

        let team = teams
            .get_mut(id.as_str())
            .ok_or_else(|| DomainError::not_found("Team not found"))?;

        team.remove_member(participant);
        Ok(team.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn make_team(name: &str, code: &str, leader: &str) -> Team {
        Team::new(
            TeamId::generate(),
            name,
            code,
            ParticipantId::new(leader),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = InMemoryTeamRepository::new();
        let team = repo.create(make_team("Alpha", "ABC123", "p1")).await.unwrap();

        assert!(repo.get(team.id()).await.unwrap().is_some());
        assert_eq!(
            repo.find_by_code("ABC123").await.unwrap().unwrap().name(),
            "Alpha"
        );
        assert!(repo.find_by_code("ZZZZZZ").await.unwrap().is_none());
        assert!(repo.find_by_name("Alpha").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let repo = InMemoryTeamRepository::new();
        repo.create(make_team("Alpha", "ABC123", "p1")).await.unwrap();

        let result = repo.create(make_team("Alpha", "XYZ789", "p2")).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let repo = InMemoryTeamRepository::new();
        repo.create(make_team("Alpha", "ABC123", "p1")).await.unwrap();

        let result = repo.create(make_team("Beta", "ABC123", "p2")).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_add_member_idempotent() {
        let repo = InMemoryTeamRepository::new();
        let team = repo.create(make_team("Alpha", "ABC123", "p1")).await.unwrap();

        let after = repo
            .add_member(team.id(), &ParticipantId::new("p2"))
            .await
            .unwrap();
        assert_eq!(after.member_count(), 2);

        let again = repo
            .add_member(team.id(), &ParticipantId::new("p2"))
            .await
            .unwrap();
        assert_eq!(again.member_count(), 2);
    }

    #[tokio::test]
    async fn test_add_member_capacity() {
        let repo = InMemoryTeamRepository::new();
        let team = repo.create(make_team("Alpha", "ABC123", "p1")).await.unwrap();

        for i in 2..=4 {
            repo.add_member(team.id(), &ParticipantId::new(format!("p{}", i)))
                .await
                .unwrap();
        }

        let result = repo.add_member(team.id(), &ParticipantId::new("p5")).await;
        assert!(matches!(result, Err(DomainError::Capacity { .. })));
    }

    #[tokio::test]
    async fn test_concurrent_joins_admit_exactly_four() {
        let repo = Arc::new(InMemoryTeamRepository::new());
        let team = repo.create(make_team("Alpha", "ABC123", "p1")).await.unwrap();

        let mut handles = Vec::new();

        for i in 2..=9 {
            let repo = Arc::clone(&repo);
            let id = team.id().clone();
            handles.push(tokio::spawn(async move {
                repo.add_member(&id, &ParticipantId::new(format!("p{}", i)))
                    .await
            }));
        }

        let mut ok = 0;
        let mut capacity = 0;

        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(DomainError::Capacity { .. }) => capacity += 1,
                Err(e) => panic!("unexpected error: {}", e),
            }
        }

        // Leader plus three joiners fill the team; the rest must be refused
        assert_eq!(ok, 3);
        assert_eq!(capacity, 5);

        let final_team = repo.get(team.id()).await.unwrap().unwrap();
        assert_eq!(final_team.member_count(), 4);
    }

    #[tokio::test]
    async fn test_remove_member_noop_when_absent() {
        let repo = InMemoryTeamRepository::new();
        let team = repo.create(make_team("Alpha", "ABC123", "p1")).await.unwrap();

        let after = repo
            .remove_member(team.id(), &ParticipantId::new("ghost"))
            .await
            .unwrap();
        assert_eq!(after.member_count(), 1);
    }

    #[tokio::test]
    async fn test_list_filtered_by_status() {
        let repo = InMemoryTeamRepository::new();
        let mut accepted = make_team("Alpha", "ABC123", "p1");
        accepted.set_status(TeamStatus::Accepted);
        repo.create(accepted).await.unwrap();
        repo.create(make_team("Beta", "XYZ789", "p2")).await.unwrap();

        assert_eq!(repo.list(None).await.unwrap().len(), 2);
        assert_eq!(
            repo.list(Some(TeamStatus::Accepted)).await.unwrap().len(),
            1
        );
        assert_eq!(
            repo.list(Some(TeamStatus::Rejected)).await.unwrap().len(),
            0
        );
    }

    #[tokio::test]
    async fn test_count_by_status() {
        let repo = InMemoryTeamRepository::new();
        let mut accepted = make_team("Alpha", "ABC123", "p1");
        accepted.set_status(TeamStatus::Accepted);
        repo.create(accepted).await.unwrap();
        repo.create(make_team("Beta", "XYZ789", "p2")).await.unwrap();

        let counts: HashMap<TeamStatus, usize> =
            repo.count_by_status().await.unwrap().into_iter().collect();

        assert_eq!(counts.get(&TeamStatus::Accepted), Some(&1));
        assert_eq!(counts.get(&TeamStatus::Pending), Some(&1));
    }
}
