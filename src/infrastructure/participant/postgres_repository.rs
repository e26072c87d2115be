//! PostgreSQL participant repository

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::participant::{
    AttendanceStatus, ExperienceLevel, Participant, ParticipantId, ParticipantRepository,
    ShirtSize, StoredParticipant,
};
use crate::domain::DomainError;

const SELECT_COLUMNS: &str = "id, email, full_name, phone, wilaya, team_name, is_team_leader, \
     team_code, experience_level, technical_skills, shirt_size, linkedin_profile, \
     github_profile, motivation_letter, heard_about_us, hackathon_experience, is_verified, \
     verification_token, verification_token_expires, attendance_status, created_at, updated_at";

/// PostgreSQL implementation of ParticipantRepository
///
/// A unique index on lower(email) provides the store-level duplicate guard.
#[derive(Debug, Clone)]
pub struct PostgresParticipantRepository {
    pool: PgPool,
}

impl PostgresParticipantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantRepository for PostgresParticipantRepository {
    async fn get(&self, id: &ParticipantId) -> Result<Option<Participant>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM participants WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get participant: {}", e)))?;

        row.map(|r| row_to_participant(&r)).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Participant>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM participants WHERE lower(email) = lower($1)",
            SELECT_COLUMNS
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get participant by email: {}", e)))?;

        row.map(|r| row_to_participant(&r)).transpose()
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Participant>, DomainError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM participants WHERE verification_token = $1",
            SELECT_COLUMNS
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get participant by token: {}", e)))?;

        row.map(|r| row_to_participant(&r)).transpose()
    }

    async fn create(&self, participant: Participant) -> Result<Participant, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO participants (
                id, email, full_name, phone, wilaya, team_name, is_team_leader,
                team_code, experience_level, technical_skills, shirt_size,
                linkedin_profile, github_profile, motivation_letter, heard_about_us,
                hackathon_experience, is_verified, verification_token,
                verification_token_expires, attendance_status, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19, $20, $21, $22)
            "#,
        )
        .bind(participant.id().as_str())
        .bind(participant.email())
        .bind(participant.full_name())
        .bind(participant.phone())
        .bind(participant.wilaya())
        .bind(participant.team_name())
        .bind(participant.is_team_leader())
        .bind(participant.team_code())
        .bind(participant.experience_level().to_string())
        .bind(participant.technical_skills())
        .bind(participant.shirt_size().to_string())
        .bind(participant.linkedin_profile())
        .bind(participant.github_profile())
        .bind(participant.motivation_letter())
        .bind(participant.heard_about_us())
        .bind(participant.hackathon_experience())
        .bind(participant.is_verified())
        .bind(participant.verification_token())
        .bind(participant.verification_token_expires())
        .bind(attendance_to_str(participant.attendance_status()))
        .bind(participant.created_at())
        .bind(participant.updated_at())
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        Ok(participant)
    }

    async fn update(&self, participant: &Participant) -> Result<Participant, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE participants
            SET email = $2, full_name = $3, phone = $4, wilaya = $5, team_name = $6,
                team_code = $7, experience_level = $8, technical_skills = $9,
                shirt_size = $10, linkedin_profile = $11, github_profile = $12,
                motivation_letter = $13, heard_about_us = $14, hackathon_experience = $15,
                is_verified = $16, verification_token = $17,
                verification_token_expires = $18, attendance_status = $19, updated_at = $20
            WHERE id = $1
            "#,
        )
        .bind(participant.id().as_str())
        .bind(participant.email())
        .bind(participant.full_name())
        .bind(participant.phone())
        .bind(participant.wilaya())
        .bind(participant.team_name())
        .bind(participant.team_code())
        .bind(participant.experience_level().to_string())
        .bind(participant.technical_skills())
        .bind(participant.shirt_size().to_string())
        .bind(participant.linkedin_profile())
        .bind(participant.github_profile())
        .bind(participant.motivation_letter())
        .bind(participant.heard_about_us())
        .bind(participant.hackathon_experience())
        .bind(participant.is_verified())
        .bind(participant.verification_token())
        .bind(participant.verification_token_expires())
        .bind(attendance_to_str(participant.attendance_status()))
        .bind(participant.updated_at())
        .execute(&self.pool)
        .await
        .map_err(map_unique_violation)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Participant not found"));
        }

        Ok(participant.clone())
    }

    async fn list(&self) -> Result<Vec<Participant>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM participants ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list participants: {}", e)))?;

        rows.iter().map(row_to_participant).collect()
    }

    async fn list_page(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Participant>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM participants ORDER BY created_at DESC OFFSET $1 LIMIT $2",
            SELECT_COLUMNS
        ))
        .bind(offset as i64)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to page participants: {}", e)))?;

        rows.iter().map(row_to_participant).collect()
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM participants")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count participants: {}", e)))?;

        Ok(count as usize)
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Participant>, DomainError> {
        let pattern = format!("%{}%", fragment);

        let rows = sqlx::query(&format!(
            "SELECT {} FROM participants WHERE full_name ILIKE $1 ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to search participants: {}", e)))?;

        rows.iter().map(row_to_participant).collect()
    }

    async fn list_by_attendance(
        &self,
        status: AttendanceStatus,
    ) -> Result<Vec<Participant>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM participants WHERE attendance_status = $1 ORDER BY created_at DESC",
            SELECT_COLUMNS
        ))
        .bind(attendance_to_str(status))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list check-ins: {}", e)))?;

        rows.iter().map(row_to_participant).collect()
    }
}

fn map_unique_violation(e: sqlx::Error) -> DomainError {
    let msg = e.to_string();

    if msg.contains("duplicate key") || msg.contains("unique constraint") {
        DomainError::conflict("Email already exists")
    } else {
        DomainError::storage(format!("Failed to write participant: {}", e))
    }
}

fn attendance_to_str(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Absent => "Absent",
        AttendanceStatus::Attended => "Attended",
    }
}

fn str_to_attendance(s: &str) -> AttendanceStatus {
    match s {
        "Attended" => AttendanceStatus::Attended,
        _ => AttendanceStatus::Absent,
    }
}

fn str_to_experience(s: &str) -> Result<ExperienceLevel, DomainError> {
    match s {
        "beginner" => Ok(ExperienceLevel::Beginner),
        "intermediate" => Ok(ExperienceLevel::Intermediate),
        "advanced" => Ok(ExperienceLevel::Advanced),
        other => Err(DomainError::storage(format!(
            "Invalid experience level in database: {}",
            other
        ))),
    }
}

fn str_to_shirt_size(s: &str) -> Result<ShirtSize, DomainError> {
    match s {
        "XS" => Ok(ShirtSize::XS),
        "S" => Ok(ShirtSize::S),
        "M" => Ok(ShirtSize::M),
        "L" => Ok(ShirtSize::L),
        "XL" => Ok(ShirtSize::XL),
        "XXL" => Ok(ShirtSize::XXL),
        other => Err(DomainError::storage(format!(
            "Invalid shirt size in database: {}",
            other
        ))),
    }
}

fn row_to_participant(row: &sqlx::postgres::PgRow) -> Result<Participant, DomainError> {
    let experience_level: String = row.get("experience_level");
    let shirt_size: String = row.get("shirt_size");
    let attendance_status: String = row.get("attendance_status");
    let id: String = row.get("id");

    Ok(Participant::restore(StoredParticipant {
        id: ParticipantId::new(id),
        email: row.get("email"),
        full_name: row.get("full_name"),
        phone: row.get("phone"),
        wilaya: row.get("wilaya"),
        team_name: row.get("team_name"),
        is_team_leader: row.get("is_team_leader"),
        team_code: row.get("team_code"),
        experience_level: str_to_experience(&experience_level)?,
        technical_skills: row.get("technical_skills"),
        shirt_size: str_to_shirt_size(&shirt_size)?,
        linkedin_profile: row.get("linkedin_profile"),
        github_profile: row.get("github_profile"),
        motivation_letter: row.get("motivation_letter"),
        heard_about_us: row.get("heard_about_us"),
        hackathon_experience: row.get("hackathon_experience"),
        is_verified: row.get("is_verified"),
        verification_token: row.get("verification_token"),
        verification_token_expires: row.get("verification_token_expires"),
        attendance_status: str_to_attendance(&attendance_status),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attendance_conversion() {
        assert_eq!(attendance_to_str(AttendanceStatus::Absent), "Absent");
        assert_eq!(attendance_to_str(AttendanceStatus::Attended), "Attended");
        assert_eq!(str_to_attendance("Attended"), AttendanceStatus::Attended);
        assert_eq!(str_to_attendance("anything"), AttendanceStatus::Absent);
    }

    #[test]
    fn test_experience_conversion() {
        assert_eq!(
            str_to_experience("beginner").unwrap(),
            ExperienceLevel::Beginner
        );
        assert!(str_to_experience("expert").is_err());
    }

    #[test]
    fn test_shirt_size_conversion() {
        assert_eq!(str_to_shirt_size("XXL").unwrap(), ShirtSize::XXL);
        assert!(str_to_shirt_size("XXXL").is_err());
    }
}
