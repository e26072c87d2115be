//! In-memory participant repository

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::participant::{
    AttendanceStatus, Participant, ParticipantId, ParticipantRepository,
};
use crate::domain::DomainError;

/// Thread-safe in-memory participant store with a unique email index
#[derive(Debug, Default)]
pub struct InMemoryParticipantRepository {
    participants: RwLock<HashMap<String, Participant>>,
}

impl InMemoryParticipantRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_err<T>(e: std::sync::PoisonError<T>) -> DomainError {
        DomainError::storage(format!("Failed to acquire participant lock: {}", e))
    }

    fn sorted_newest_first(mut items: Vec<Participant>) -> Vec<Participant> {
        items.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        items
    }
}

#[async_trait]
impl ParticipantRepository for InMemoryParticipantRepository {
    async fn get(&self, id: &ParticipantId) -> Result<Option<Participant>, DomainError> {
        let participants = self.participants.read().map_err(Self::lock_err)?;
        Ok(participants.get(id.as_str()).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Participant>, DomainError> {
        let participants = self.participants.read().map_err(Self::lock_err)?;
        Ok(participants
            .values()
            .find(|p| p.email().eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Participant>, DomainError> {
        let participants = self.participants.read().map_err(Self::lock_err)?;
        Ok(participants
            .values()
            .find(|p| p.verification_token() == Some(token))
            .cloned())
    }

    async fn create(&self, participant: Participant) -> Result<Participant, DomainError> {
        let mut participants = self.participants.write().map_err(Self::lock_err)?;

        if participants
            .values()
            .any(|p| p.email().eq_ignore_ascii_case(participant.email()))
        {
            return Err(DomainError::conflict("Email already exists"));
        }

        participants.insert(participant.id().as_str().to_string(), participant.clone());
        Ok(participant)
    }

    async fn update(&self, participant: &Participant) -> Result<Participant, DomainError> {
        let mut participants = self.participants.write().map_err(Self::lock_err)?;

        if !participants.contains_key(participant.id().as_str()) {
            return Err(DomainError::not_found("Participant not found"));
        }

        if participants
            .values()
            .any(|p| p.id() != participant.id() && p.email().eq_ignore_ascii_case(participant.email()))
        {
            return Err(DomainError::conflict("Email already exists"));
        }

        participants.insert(participant.id().as_str().to_string(), participant.clone());
        Ok(participant.clone())
    }

    async fn list(&self) -> Result<Vec<Participant>, DomainError> {
        let participants = self.participants.read().map_err(Self::lock_err)?;
        Ok(Self::sorted_newest_first(
            participants.values().cloned().collect(),
        ))
    }

    async fn list_page(
        &self,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<Participant>, DomainError> {
        let all = self.list().await?;
        Ok(all.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let participants = self.participants.read().map_err(Self::lock_err)?;
        Ok(participants.len())
    }

    async fn search_by_name(&self, fragment: &str) -> Result<Vec<Participant>, DomainError> {
        let needle = fragment.to_lowercase();
        let participants = self.participants.read().map_err(Self::lock_err)?;

        Ok(Self::sorted_newest_first(
            participants
                .values()
                .filter(|p| p.full_name().to_lowercase().contains(&needle))
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_attendance(
        &self,
        status: AttendanceStatus,
    ) -> Result<Vec<Participant>, DomainError> {
        let participants = self.participants.read().map_err(Self::lock_err)?;

        Ok(Self::sorted_newest_first(
            participants
                .values()
                .filter(|p| p.attendance_status() == status)
                .cloned()
                .collect(),
        ))
    }
}
