//! PostgreSQL team repository

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::participant::ParticipantId;
use crate::domain::team::{Team, TeamId, TeamRepository, TeamStatus, MAX_TEAM_SIZE};
use crate::domain::DomainError;

const SELECT_COLUMNS: &str =
    "id, name, code, leader_id, members, status, created_at, updated_at";

/// PostgreSQL implementation of TeamRepository
///
/// Membership mutation is a single conditional UPDATE guarded by the
/// membership cardinality, so the capacity re-check and the append are one
/// atomic statement even across service instances.
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM teams WHERE id = $1", SELECT_COLUMNS))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get team: {}", e)))?;

        row.map(|r| row_to_team(&r)).transpose()
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        self.fetch(id).await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM teams WHERE code = $1",
            SELECT_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get team by code: {}", e)))?;

        row.map(|r| row_to_team(&r)).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM teams WHERE name = $1",
            SELECT_COLUMNS
        ))
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get team by name: {}", e)))?;

        row.map(|r| row_to_team(&r)).transpose()
    }

    async fn create(&self, team: Team) -> Result<Team, DomainError> {
        let members: Vec<String> = team
            .members()
            .iter()
            .map(|m| m.as_str().to_string())
            .collect();

        sqlx::query(
            r#"
            INSERT INTO teams (id, name, code, leader_id, members, status,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(team.id().as_str())
        .bind(team.name())
        .bind(team.code())
        .bind(team.leader().as_str())
        .bind(&members)
        .bind(team.status().to_string())
        .bind(team.created_at())
        .bind(team.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, team.name()))?;

        Ok(team)
    }

    async fn update(&self, team: &Team) -> Result<Team, DomainError> {
        let members: Vec<String> = team
            .members()
            .iter()
            .map(|m| m.as_str().to_string())
            .collect();

        let result = sqlx::query(
            r#"
            UPDATE teams
            SET name = $2, members = $3, status = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(team.id().as_str())
        .bind(team.name())
        .bind(&members)
        .bind(team.status().to_string())
        .bind(team.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, team.name()))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Team not found"));
        }

        Ok(team.clone())
    }

    async fn list(&self, status: Option<TeamStatus>) -> Result<Vec<Team>, DomainError> {
        let rows = match status {
            Some(s) => {
                sqlx::query(&format!(
                    "SELECT {} FROM teams WHERE status = $1 ORDER BY created_at DESC",
                    SELECT_COLUMNS
                ))
                .bind(s.to_string())
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {} FROM teams ORDER BY created_at DESC",
                    SELECT_COLUMNS
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| DomainError::storage(format!("Failed to list teams: {}", e)))?;

        rows.iter().map(row_to_team).collect()
    }

    async fn count_by_status(&self) -> Result<Vec<(TeamStatus, usize)>, DomainError> {
        let rows = sqlx::query("SELECT status, COUNT(*) AS n FROM teams GROUP BY status")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count teams: {}", e)))?;

        let mut counts = Vec::with_capacity(rows.len());

        for row in rows {
            let status: String = row.get("status");
            let n: i64 = row.get("n");

            if let Some(status) = TeamStatus::parse_ci(&status) {
                counts.push((status, n as usize));
            }
        }

        Ok(counts)
    }

    async fn add_member(
        &self,
        id: &TeamId,
        participant: &ParticipantId,
    ) -> Result<Team, DomainError> {
        // One conditional statement: the cardinality guard and the append
        // are evaluated atomically by the database.
        let result = sqlx::query(
            r#"
            UPDATE teams
            SET members = array_append(members, $2), updated_at = NOW()
            WHERE id = $1
              AND NOT ($2 = ANY(members))
              AND cardinality(members) < $3
            "#,
        )
        .bind(id.as_str())
        .bind(participant.as_str())
        .bind(MAX_TEAM_SIZE as i32)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to add member: {}", e)))?;

        let team = self
            .fetch(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Team not found"))?;

        if result.rows_affected() == 0 && !team.contains(participant) {
            return Err(DomainError::capacity(
                "This team has reached the maximum capacity of 4 members",
            ));
        }

        Ok(team)
    }

    async fn remove_member(
        &self,
        id: &TeamId,
        participant: &ParticipantId,
    ) -> Result<Team, DomainError> {
        sqlx::query(
            r#"
            UPDATE teams
            SET members = array_remove(members, $2), updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .bind(participant.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to remove member: {}", e)))?;

        self.fetch(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Team not found"))
    }
}

fn map_unique_violation(e: sqlx::Error, name: &str) -> DomainError {
    let msg = e.to_string();

    if msg.contains("duplicate key") || msg.contains("unique constraint") {
        if msg.contains("code") {
            DomainError::conflict("Team code already exists")
        } else {
            DomainError::conflict(format!("Team name '{}' already exists", name))
        }
    } else {
        DomainError::storage(format!("Failed to write team: {}", e))
    }
}

fn row_to_team(row: &sqlx::postgres::PgRow) -> Result<Team, DomainError> {
    let id: String = row.get("id");
    let name: String = row.get("name");
    let code: String = row.get("code");
    let leader_id: String = row.get("leader_id");
    let members: Vec<String> = row.get("members");
    let status: String = row.get("status");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let status = TeamStatus::parse_ci(&status)
        .ok_or_else(|| DomainError::storage(format!("Invalid team status in database: {}", status)))?;

    Ok(Team::restore(
        TeamId::new(id),
        name,
        code,
        ParticipantId::new(leader_id),
        members.into_iter().map(ParticipantId::new).collect(),
        status,
        created_at,
        updated_at,
    ))
}
