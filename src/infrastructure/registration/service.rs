//! Participant registration workflow
//!
//! The state machine coordinating participant creation, email verification
//! and team linkage. Team membership is finalized only on verification:
//! leaders get their team created then, members are appended to the team
//! they registered a code for. Membership writes happen before the verified
//! flag is persisted, so a failure part-way leaves the token valid and the
//! transition retryable.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::participant::{
    ExperienceLevel, NewParticipant, Participant, ParticipantId, ParticipantRepository, ShirtSize,
};
use crate::domain::team::Team;
use crate::domain::DomainError;
use crate::infrastructure::email::{templates, Mailer};
use crate::infrastructure::keygen::KeyGenerator;
use crate::infrastructure::team::TeamService;

/// Enumerated patch for updating a participant
///
/// Team code changes trigger registry side effects; everything else is a
/// plain field overwrite.
#[derive(Debug, Clone, Default)]
pub struct ParticipantUpdate {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub wilaya: Option<String>,
    pub experience_level: Option<ExperienceLevel>,
    pub technical_skills: Option<Vec<String>>,
    pub shirt_size: Option<ShirtSize>,
    pub linkedin_profile: Option<String>,
    pub github_profile: Option<String>,
    pub motivation_letter: Option<String>,
    pub heard_about_us: Option<String>,
    pub hackathon_experience: Option<String>,
    pub team_code: Option<String>,
}

/// One page of participants for the admin listing
#[derive(Debug, Clone)]
pub struct ParticipantPage {
    pub participants: Vec<Participant>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

/// Coordinates registration, verification and participant updates
pub struct RegistrationService {
    participants: Arc<dyn ParticipantRepository>,
    teams: Arc<TeamService>,
    mailer: Arc<dyn Mailer>,
    keygen: KeyGenerator,
    /// Public base URL used to build verification links
    base_url: String,
}

impl RegistrationService {
    pub fn new(
        participants: Arc<dyn ParticipantRepository>,
        teams: Arc<TeamService>,
        mailer: Arc<dyn Mailer>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            participants,
            teams,
            mailer,
            keygen: KeyGenerator::new(),
            base_url: base_url.into(),
        }
    }

    /// Submit a registration
    ///
    /// Validation failures leave no side effects: the team code is resolved
    /// and the duplicate-email check runs before anything is written. No
    /// team is created or joined here for either role.
    pub async fn register(&self, mut new: NewParticipant) -> Result<Participant, DomainError> {
        if new.is_team_leader {
            // Leaders get their code generated at verification time
            new.team_code = None;
        } else {
            let code = new
                .team_code
                .as_deref()
                .ok_or_else(|| DomainError::validation("Team code is required to join a team"))?;

            self.teams.validate_code_for_join(code).await?;
        }

        if self.participants.find_by_email(&new.email).await?.is_some() {
            return Err(DomainError::conflict("Email already exists"));
        }

        let email = new.email.clone();
        let mut participant = Participant::new(ParticipantId::generate(), new)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        let generated = self.keygen.verification_token();
        participant.set_verification_token(generated.token.clone(), generated.expires_at);

        let participant = self.participants.create(participant).await?;

        info!(email = %email, leader = participant.is_team_leader(), "Participant registered");

        self.send_verification(&participant, &generated.token).await;

        Ok(participant)
    }

    /// Complete a verification with a single-use token
    pub async fn verify(&self, token: &str) -> Result<Participant, DomainError> {
        let mut participant = self
            .participants
            .find_by_token(token)
            .await?
            .filter(|p| p.token_is_valid(token, Utc::now()))
            .ok_or_else(|| DomainError::validation("Invalid or expired verification token"))?;

        let team = if participant.is_team_leader() {
            let team = self.create_leader_team(&participant).await?;
            participant.set_team_code(team.code());
            team
        } else {
            let code = participant
                .team_code()
                .ok_or_else(|| DomainError::internal("Member registration has no team code"))?
                .to_string();

            // The team exists only once the leader verified; a missing team
            // here means that never happened (or the code went stale).
            let team = self.teams.get_by_code(&code).await.map_err(|_| {
                DomainError::not_found(
                    "Your team could not be found. Please contact support before the event.",
                )
            })?;

            let team = self.teams.add_member(team.id(), participant.id()).await?;
            participant.set_team_name(team.name());
            team
        };

        // Membership is committed; only now flip the verified flag. If this
        // write fails the token stays valid and a retry converges (team
        // creation and member append are both idempotent for this id).
        participant.mark_verified();
        let participant = self.participants.update(&participant).await?;

        info!(email = %participant.email(), team = %team.name(), "Email verified, team linkage finalized");

        if participant.is_team_leader() {
            let message = templates::team_code_email(
                participant.email(),
                participant.full_name(),
                team.name(),
                team.code(),
            );

            if !self.mailer.send(&message).await {
                warn!(email = %participant.email(), "Failed to send team code email");
            }
        } else {
            let leader_name = match self.participants.get(team.leader()).await? {
                Some(leader) => leader.full_name().to_string(),
                None => "your team leader".to_string(),
            };

            let message = templates::team_joined_email(
                participant.email(),
                participant.full_name(),
                team.name(),
                &leader_name,
            );

            if !self.mailer.send(&message).await {
                warn!(email = %participant.email(), "Failed to send team joined email");
            }
        }

        Ok(participant)
    }

    /// Re-send the verification email, rotating the token
    pub async fn resend_verification(&self, id: &ParticipantId) -> Result<(), DomainError> {
        let mut participant = self
            .participants
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Participant not found"))?;

        if participant.is_verified() {
            return Err(DomainError::validation("Email already verified"));
        }

        let generated = self.keygen.verification_token();
        participant.set_verification_token(generated.token.clone(), generated.expires_at);
        let participant = self.participants.update(&participant).await?;

        self.send_verification(&participant, &generated.token).await;

        Ok(())
    }

    /// Apply an enumerated patch; a team code change re-homes the participant
    pub async fn update(
        &self,
        id: &ParticipantId,
        patch: ParticipantUpdate,
    ) -> Result<Participant, DomainError> {
        let mut participant = self
            .participants
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Participant not found"))?;

        if let Some(email) = &patch.email {
            if !email.eq_ignore_ascii_case(participant.email())
                && self.participants.find_by_email(email).await?.is_some()
            {
                return Err(DomainError::conflict("Email already exists"));
            }
        }

        let new_team = match &patch.team_code {
            Some(code) if Some(code.as_str()) != participant.team_code() => {
                // Guard before any mutation: the new team must exist with
                // free capacity or the whole update is rejected.
                Some(self.teams.validate_code_for_join(code).await?)
            }
            _ => None,
        };

        if let Some(team) = &new_team {
            // Join the new team first - the atomic append can still refuse
            // on a lost capacity race, and then nothing has changed yet.
            self.teams.add_member(team.id(), participant.id()).await?;

            if let Some(old_code) = participant.team_code() {
                if let Ok(old_team) = self.teams.get_by_code(old_code).await {
                    self.teams
                        .remove_member(old_team.id(), participant.id())
                        .await?;
                }
            }

            participant.set_team_code(team.code());
            participant.set_team_name(team.name());
        }

        apply_field_patch(&mut participant, patch)?;

        self.participants.update(&participant).await
    }

    pub async fn get(&self, id: &ParticipantId) -> Result<Participant, DomainError> {
        self.participants
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Participant not found"))
    }

    pub async fn list(&self) -> Result<Vec<Participant>, DomainError> {
        self.participants.list().await
    }

    /// Case-insensitive name search; the fragment must be at least 2 chars
    pub async fn search_by_name(&self, fragment: &str) -> Result<Vec<Participant>, DomainError> {
        let fragment = fragment.trim();

        if fragment.len() < 2 {
            return Err(DomainError::validation(
                "Name parameter must be at least 2 characters",
            ));
        }

        self.participants.search_by_name(fragment).await
    }

    /// Page through participants, newest first
    pub async fn list_page(&self, page: usize, limit: usize) -> Result<ParticipantPage, DomainError> {
        let page = page.max(1);
        let limit = limit.max(1);
        let offset = (page - 1) * limit;

        let participants = self.participants.list_page(offset, limit).await?;
        let total = self.participants.count().await?;

        Ok(ParticipantPage {
            participants,
            page,
            total_pages: total.div_ceil(limit),
            total,
        })
    }

    /// Create the leader's team, tolerating a replayed verification
    async fn create_leader_team(&self, participant: &Participant) -> Result<Team, DomainError> {
        match self
            .teams
            .create_for_leader(participant.team_name(), participant.id())
            .await
        {
            Ok(team) => Ok(team),
            Err(DomainError::Conflict { .. }) => {
                // A previous verify attempt may have created the team before
                // the participant write failed; reuse it if it is ours.
                match self.teams.find_by_name(participant.team_name()).await? {
                    Some(team) if team.leader() == participant.id() => Ok(team),
                    _ => Err(DomainError::conflict("Team name already exists")),
                }
            }
            Err(e) => Err(e),
        }
    }

    async fn send_verification(&self, participant: &Participant, token: &str) {
        let url = format!(
            "{}/api/participants/verify-email/{}",
            self.base_url.trim_end_matches('/'),
            token
        );

        let message =
            templates::verification_email(participant.email(), participant.full_name(), &url);

        // Fire-and-forget: registration already committed
        if !self.mailer.send(&message).await {
            warn!(email = %participant.email(), "Failed to send verification email");
        }
    }
}

impl std::fmt::Debug for RegistrationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationService")
            .field("base_url", &self.base_url)
            .finish()
    }
}

fn apply_field_patch(
    participant: &mut Participant,
    patch: ParticipantUpdate,
) -> Result<(), DomainError> {
    let validation = |e: crate::domain::participant::ParticipantValidationError| {
        DomainError::validation(e.to_string())
    };

    if let Some(email) = patch.email {
        participant.set_email(email).map_err(validation)?;
    }

    if let Some(full_name) = patch.full_name {
        participant.set_full_name(full_name).map_err(validation)?;
    }

    if let Some(phone) = patch.phone {
        participant.set_phone(phone).map_err(validation)?;
    }

    if let Some(wilaya) = patch.wilaya {
        participant.set_wilaya(wilaya).map_err(validation)?;
    }

    if let Some(level) = patch.experience_level {
        participant.set_experience_level(level);
    }

    if let Some(skills) = patch.technical_skills {
        participant.set_technical_skills(skills);
    }

    if let Some(size) = patch.shirt_size {
        participant.set_shirt_size(size);
    }

    if let Some(url) = patch.linkedin_profile {
        participant.set_linkedin_profile(url);
    }

    if let Some(url) = patch.github_profile {
        participant.set_github_profile(url);
    }

    if let Some(text) = patch.motivation_letter {
        participant.set_motivation_letter(text);
    }

    if let Some(text) = patch.heard_about_us {
        participant.set_heard_about_us(text);
    }

    if let Some(text) = patch.hackathon_experience {
        participant.set_hackathon_experience(text);
    }

    Ok(())
}
