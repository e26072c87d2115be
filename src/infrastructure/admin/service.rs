//! Admin operations - authentication, check-in and bulk notifications

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::admin::{
    validate_password, validate_username, Admin, AdminId, AdminRepository,
};
use crate::domain::participant::{
    AttendanceStatus, Participant, ParticipantId, ParticipantRepository,
};
use crate::domain::team::{Team, TeamRepository, TeamStatus};
use crate::domain::DomainError;
use crate::infrastructure::auth::{PasswordHasher, TokenPurpose, TokenSigner};
use crate::infrastructure::email::{templates, Mailer};

/// Result of a bulk notification run
#[derive(Debug, Clone, Copy)]
pub struct BulkSendReport {
    /// Emails delivered
    pub sent: usize,
    /// Recipients attempted
    pub attempted: usize,
}

/// Admin-facing operations over the shared stores
pub struct AdminService {
    admins: Arc<dyn AdminRepository>,
    participants: Arc<dyn ParticipantRepository>,
    teams: Arc<dyn TeamRepository>,
    hasher: Arc<dyn PasswordHasher>,
    signer: Arc<dyn TokenSigner>,
    mailer: Arc<dyn Mailer>,
    /// Frontend base URL used in password reset links
    client_url: String,
}

impl AdminService {
    pub fn new(
        admins: Arc<dyn AdminRepository>,
        participants: Arc<dyn ParticipantRepository>,
        teams: Arc<dyn TeamRepository>,
        hasher: Arc<dyn PasswordHasher>,
        signer: Arc<dyn TokenSigner>,
        mailer: Arc<dyn Mailer>,
        client_url: impl Into<String>,
    ) -> Self {
        Self {
            admins,
            participants,
            teams,
            hasher,
            signer,
            mailer,
            client_url: client_url.into(),
        }
    }

    /// Register a new admin account
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Admin, DomainError> {
        validate_username(username).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(password).map_err(|e| DomainError::validation(e.to_string()))?;

        if self.admins.find_by_email(email).await?.is_some()
            || self.admins.find_by_username(username).await?.is_some()
        {
            return Err(DomainError::conflict("Admin already exists"));
        }

        let hash = self.hasher.hash_password(password)?;
        let admin = Admin::new(AdminId::generate(), username, email, hash)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        info!(username = %admin.username(), "Admin account created");

        self.admins.create(admin).await
    }

    /// Authenticate and issue a session token
    ///
    /// Unknown email reports NotFound while a wrong password reports Auth,
    /// mirroring the original API contract (the distinction leaks account
    /// existence; kept deliberately).
    pub async fn login(&self, email: &str, password: &str) -> Result<String, DomainError> {
        let admin = self
            .admins
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("Invalid credentials"))?;

        if !self.hasher.verify_password(password, admin.password_hash()) {
            return Err(DomainError::auth("Invalid credentials"));
        }

        self.signer.issue_session(&admin)
    }

    /// Email a 15-minute reset link
    pub async fn forgot_password(&self, email: &str) -> Result<(), DomainError> {
        let admin = self
            .admins
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("Admin not found"))?;

        let token = self.signer.issue_reset(&admin)?;
        let reset_link = format!(
            "{}/reset-password?token={}",
            self.client_url.trim_end_matches('/'),
            token
        );

        let message = templates::reset_password_email(admin.email(), &reset_link);

        // Unlike registration mail this one is the whole point of the
        // operation, so a failed send is surfaced.
        if !self.mailer.send(&message).await {
            return Err(DomainError::internal("Failed to send reset password email"));
        }

        Ok(())
    }

    /// Validate a reset token and set a new password
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), DomainError> {
        let claims = self.signer.verify(token, TokenPurpose::PasswordReset)?;

        let mut admin = self
            .admins
            .get(&AdminId::new(&claims.sub))
            .await?
            .ok_or_else(|| DomainError::not_found("Admin not found"))?;

        validate_password(new_password).map_err(|e| DomainError::validation(e.to_string()))?;

        let hash = self.hasher.hash_password(new_password)?;
        admin.set_password_hash(hash);
        self.admins.update(&admin).await?;

        info!(username = %admin.username(), "Admin password reset");

        Ok(())
    }

    /// Check a participant in by email or QR payload (participant id)
    pub async fn check_in(
        &self,
        email: Option<&str>,
        qr_code: Option<&str>,
    ) -> Result<Participant, DomainError> {
        let participant = match (email, qr_code) {
            (Some(email), _) => self.participants.find_by_email(email).await?,
            (None, Some(qr)) => self.participants.get(&ParticipantId::new(qr)).await?,
            (None, None) => {
                return Err(DomainError::validation("Email or QR code is required"));
            }
        };

        let mut participant =
            participant.ok_or_else(|| DomainError::not_found("Participant not found"))?;

        participant.check_in();
        let participant = self.participants.update(&participant).await?;

        info!(email = %participant.email(), "Participant checked in");

        Ok(participant)
    }

    /// Participants who have been checked in
    pub async fn list_check_ins(&self) -> Result<Vec<Participant>, DomainError> {
        self.participants
            .list_by_attendance(AttendanceStatus::Attended)
            .await
    }

    /// Send the acceptance email to every member of every accepted team
    pub async fn send_acceptance_emails(&self) -> Result<BulkSendReport, DomainError> {
        let teams = self.teams.list(Some(TeamStatus::Accepted)).await?;

        if teams.is_empty() {
            return Err(DomainError::not_found("No accepted teams found"));
        }

        self.send_to_teams(&teams, templates::acceptance_email).await
    }

    /// Send the waitlist notification to every member of non-accepted teams
    pub async fn send_waitlist_emails(&self) -> Result<BulkSendReport, DomainError> {
        let teams: Vec<Team> = self
            .teams
            .list(None)
            .await?
            .into_iter()
            .filter(|t| !t.status().is_accepted())
            .collect();

        if teams.is_empty() {
            return Err(DomainError::not_found("No teams found for the waitlist"));
        }

        self.send_to_teams(&teams, templates::waitlist_email).await
    }

    /// Sequential best-effort delivery: one failure never aborts the batch
    async fn send_to_teams(
        &self,
        teams: &[Team],
        template: fn(&str, &str, &str) -> crate::infrastructure::email::EmailMessage,
    ) -> Result<BulkSendReport, DomainError> {
        let mut sent = 0;
        let mut attempted = 0;

        for team in teams {
            for member in team.members() {
                let Some(participant) = self.participants.get(member).await? else {
                    warn!(participant = %member, team = %team.name(), "Member record missing, skipping");
                    continue;
                };

                attempted += 1;
                let message = template(participant.email(), participant.full_name(), team.name());

                if self.mailer.send(&message).await {
                    sent += 1;
                } else {
                    warn!(email = %participant.email(), "Bulk email send failed, continuing");
                }
            }
        }

        info!(sent, attempted, "Bulk notification run finished");

        Ok(BulkSendReport { sent, attempted })
    }
}

impl std::fmt::Debug for AdminService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminService")
            .field("client_url", &self.client_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::participant::test_new_participant;
    use crate::infrastructure::admin::repository::InMemoryAdminRepository;
    use crate::infrastructure::auth::{Argon2PasswordHasher, JwtConfig, JwtSigner};
    use crate::infrastructure::email::mailer::mock::MockMailer;
    use crate::infrastructure::participant::repository::InMemoryParticipantRepository;
    use crate::infrastructure::team::repository::InMemoryTeamRepository;
    use crate::domain::team::{Team, TeamId};

    struct Harness {
        service: AdminService,
        participants: Arc<InMemoryParticipantRepository>,
        teams: Arc<InMemoryTeamRepository>,
        mailer: Arc<MockMailer>,
        signer: Arc<JwtSigner>,
    }

    fn harness() -> Harness {
        harness_with_mailer(Arc::new(MockMailer::new()))
    }

    fn harness_with_mailer(mailer: Arc<MockMailer>) -> Harness {
        let participants = Arc::new(InMemoryParticipantRepository::new());
        let teams = Arc::new(InMemoryTeamRepository::new());
        let signer = Arc::new(JwtSigner::new(JwtConfig::new("test-secret")));

        let service = AdminService::new(
            Arc::new(InMemoryAdminRepository::new()),
            Arc::clone(&participants) as Arc<dyn ParticipantRepository>,
            Arc::clone(&teams) as Arc<dyn TeamRepository>,
            Arc::new(Argon2PasswordHasher::new()),
            Arc::clone(&signer) as Arc<dyn TokenSigner>,
            mailer.clone() as Arc<dyn Mailer>,
            "http://localhost:3000",
        );

        Harness {
            service,
            participants,
            teams,
            mailer,
            signer,
        }
    }

    async fn seed_participant(h: &Harness, email: &str) -> Participant {
        let mut new = test_new_participant(email, "Alpha", false);
        new.team_code = Some("ABC123".to_string());
        let p = Participant::new(ParticipantId::generate(), new).unwrap();
        h.participants.create(p).await.unwrap()
    }

    #[tokio::test]
    async fn test_signup_and_login() {
        let h = harness();

        h.service
            .signup("organizer", "org@example.com", "super-secret-pw")
            .await
            .unwrap();

        let token = h
            .service
            .login("org@example.com", "super-secret-pw")
            .await
            .unwrap();

        let claims = h.signer.verify(&token, TokenPurpose::Session).unwrap();
        assert_eq!(claims.email, "org@example.com");
    }

    #[tokio::test]
    async fn test_signup_duplicate() {
        let h = harness();

        h.service
            .signup("organizer", "org@example.com", "super-secret-pw")
            .await
            .unwrap();

        let result = h
            .service
            .signup("organizer2", "org@example.com", "super-secret-pw")
            .await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_not_found() {
        let h = harness();

        let result = h.service.login("ghost@example.com", "whatever").await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_auth_error() {
        let h = harness();

        h.service
            .signup("organizer", "org@example.com", "super-secret-pw")
            .await
            .unwrap();

        let result = h.service.login("org@example.com", "wrong-password").await;
        assert!(matches!(result, Err(DomainError::Auth { .. })));
    }

    #[tokio::test]
    async fn test_password_reset_flow() {
        let h = harness();

        h.service
            .signup("organizer", "org@example.com", "old-password-1")
            .await
            .unwrap();

        h.service.forgot_password("org@example.com").await.unwrap();

        // Reset link was mailed with an embedded token
        let sent = h.mailer.sent();
        assert_eq!(sent.len(), 1);
        let html = &sent[0].html;
        let token = html
            .split("token=")
            .nth(1)
            .unwrap()
            .split('"')
            .next()
            .unwrap()
            .to_string();

        h.service
            .reset_password(&token, "new-password-1")
            .await
            .unwrap();

        assert!(h.service.login("org@example.com", "old-password-1").await.is_err());
        assert!(h.service.login("org@example.com", "new-password-1").await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_password_bad_token() {
        let h = harness();

        let result = h.service.reset_password("garbage", "new-password-1").await;
        assert!(matches!(result, Err(DomainError::Auth { .. })));
    }

    #[tokio::test]
    async fn test_session_token_rejected_for_reset() {
        let h = harness();

        h.service
            .signup("organizer", "org@example.com", "super-secret-pw")
            .await
            .unwrap();
        let session = h
            .service
            .login("org@example.com", "super-secret-pw")
            .await
            .unwrap();

        let result = h.service.reset_password(&session, "new-password-1").await;
        assert!(matches!(result, Err(DomainError::Auth { .. })));
    }

    #[tokio::test]
    async fn test_check_in_by_email_idempotent() {
        let h = harness();
        seed_participant(&h, "p@example.com").await;

        let first = h.service.check_in(Some("p@example.com"), None).await.unwrap();
        assert!(first.attendance_status().is_attended());

        let second = h.service.check_in(Some("p@example.com"), None).await.unwrap();
        assert!(second.attendance_status().is_attended());

        assert_eq!(h.service.list_check_ins().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_check_in_by_qr_code() {
        let h = harness();
        let p = seed_participant(&h, "p@example.com").await;

        let checked = h
            .service
            .check_in(None, Some(p.id().as_str()))
            .await
            .unwrap();
        assert!(checked.attendance_status().is_attended());
    }

    #[tokio::test]
    async fn test_check_in_requires_identifier() {
        let h = harness();

        let result = h.service.check_in(None, None).await;
        assert!(matches!(result, Err(DomainError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_check_in_unknown_participant() {
        let h = harness();

        let result = h.service.check_in(Some("ghost@example.com"), None).await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    async fn seed_team_with_members(
        h: &Harness,
        name: &str,
        code: &str,
        status: TeamStatus,
        emails: &[&str],
    ) {
        let mut ids = Vec::new();

        for email in emails {
            let p = seed_participant(h, email).await;
            ids.push(p.id().clone());
        }

        let mut team = Team::new(TeamId::generate(), name, code, ids[0].clone()).unwrap();
        for id in &ids[1..] {
            team.add_member(id.clone()).unwrap();
        }
        team.set_status(status);
        h.teams.create(team).await.unwrap();
    }

    #[tokio::test]
    async fn test_acceptance_emails_target_accepted_teams() {
        let h = harness();

        seed_team_with_members(
            &h,
            "Alpha",
            "AAA111",
            TeamStatus::Accepted,
            &["a1@example.com", "a2@example.com"],
        )
        .await;
        seed_team_with_members(&h, "Beta", "BBB222", TeamStatus::Pending, &["b1@example.com"])
            .await;

        let report = h.service.send_acceptance_emails().await.unwrap();

        assert_eq!(report.sent, 2);
        assert_eq!(report.attempted, 2);

        let recipients: Vec<String> = h.mailer.sent().iter().map(|m| m.to.clone()).collect();
        assert!(recipients.contains(&"a1@example.com".to_string()));
        assert!(!recipients.contains(&"b1@example.com".to_string()));
    }

    #[tokio::test]
    async fn test_acceptance_emails_none_found() {
        let h = harness();

        seed_team_with_members(&h, "Beta", "BBB222", TeamStatus::Pending, &["b1@example.com"])
            .await;

        let result = h.service.send_acceptance_emails().await;
        assert!(matches!(result, Err(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_waitlist_emails_target_non_accepted_teams() {
        let h = harness();

        seed_team_with_members(
            &h,
            "Alpha",
            "AAA111",
            TeamStatus::Accepted,
            &["a1@example.com"],
        )
        .await;
        seed_team_with_members(&h, "Beta", "BBB222", TeamStatus::Pending, &["b1@example.com"])
            .await;
        seed_team_with_members(
            &h,
            "Gamma",
            "CCC333",
            TeamStatus::Rejected,
            &["c1@example.com"],
        )
        .await;

        let report = h.service.send_waitlist_emails().await.unwrap();

        assert_eq!(report.sent, 2);
        let recipients: Vec<String> = h.mailer.sent().iter().map(|m| m.to.clone()).collect();
        assert!(!recipients.contains(&"a1@example.com".to_string()));
    }

    #[tokio::test]
    async fn test_bulk_send_continues_past_failures() {
        let h = harness_with_mailer(Arc::new(MockMailer::failing()));

        seed_team_with_members(
            &h,
            "Alpha",
            "AAA111",
            TeamStatus::Accepted,
            &["a1@example.com", "a2@example.com", "a3@example.com"],
        )
        .await;

        let report = h.service.send_acceptance_emails().await.unwrap();

        // Every send failed but the batch still ran to completion
        assert_eq!(report.sent, 0);
        assert_eq!(report.attempted, 3);
        assert_eq!(h.mailer.sent_count(), 3);
    }
}
