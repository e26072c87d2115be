//! Participant entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{
    validate_email, validate_full_name, validate_phone, validate_team_name, validate_wilaya,
    ParticipantValidationError,
};

/// Participant identifier - a UUID assigned at registration time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticipantId(String);

impl ParticipantId {
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

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Self-reported experience level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Beginner => write!(f, "beginner"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

/// Shirt size for event swag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShirtSize {
    XS,
    S,
    M,
    L,
    XL,
    XXL,
}

impl std::fmt::Display for ShirtSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::XS => "XS",
            Self::S => "S",
            Self::M => "M",
            Self::L => "L",
            Self::XL => "XL",
            Self::XXL => "XXL",
        };
        write!(f, "{}", s)
    }
}

/// Attendance state flipped by the admin check-in flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AttendanceStatus {
    #[default]
    Absent,
    Attended,
}

impl AttendanceStatus {
    pub fn is_attended(&self) -> bool {
        matches!(self, Self::Attended)
    }
}

/// Input for creating a participant record
#[derive(Debug, Clone)]
pub struct NewParticipant {
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub wilaya: String,
    pub team_name: String,
    pub is_team_leader: bool,
    /// Required for members joining an existing team; never set for leaders
    pub team_code: Option<String>,
    pub experience_level: ExperienceLevel,
    pub technical_skills: Vec<String>,
    pub shirt_size: ShirtSize,
    pub linkedin_profile: String,
    pub github_profile: String,
    pub motivation_letter: String,
    pub heard_about_us: String,
    pub hackathon_experience: String,
}

/// Full stored state of a participant; used by repository implementations
/// to rebuild the entity from a row
#[derive(Debug, Clone)]
pub struct StoredParticipant {
    pub id: ParticipantId,
    pub email: String,
    pub full_name: String,
    pub phone: String,
    pub wilaya: String,
    pub team_name: String,
    pub is_team_leader: bool,
    pub team_code: Option<String>,
    pub experience_level: ExperienceLevel,
    pub technical_skills: Vec<String>,
    pub shirt_size: ShirtSize,
    pub linkedin_profile: String,
    pub github_profile: String,
    pub motivation_letter: String,
    pub heard_about_us: String,
    pub hackathon_experience: String,
    pub is_verified: bool,
    pub verification_token: Option<String>,
    pub verification_token_expires: Option<DateTime<Utc>>,
    pub attendance_status: AttendanceStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Participant entity
///
/// Created unverified at submission time. Team linkage is finalized only
/// when the email verification completes: leaders get a freshly generated
/// team code, members keep the code they registered with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    id: ParticipantId,
    email: String,
    full_name: String,
    phone: String,
    wilaya: String,
    team_name: String,
    is_team_leader: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    team_code: Option<String>,
    experience_level: ExperienceLevel,
    technical_skills: Vec<String>,
    shirt_size: ShirtSize,
    linkedin_profile: String,
    github_profile: String,
    motivation_letter: String,
    heard_about_us: String,
    hackathon_experience: String,
    is_verified: bool,
    /// Single-use token; never exposed in serialized responses
    #[serde(default, skip_serializing)]
    verification_token: Option<String>,
    #[serde(default, skip_serializing)]
    verification_token_expires: Option<DateTime<Utc>>,
    attendance_status: AttendanceStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Participant {
    /// Create a new unverified participant
    pub fn new(id: ParticipantId, new: NewParticipant) -> Result<Self, ParticipantValidationError> {
        validate_email(&new.email)?;
        validate_full_name(&new.full_name)?;
        validate_phone(&new.phone)?;
        validate_wilaya(&new.wilaya)?;
        validate_team_name(&new.team_name)?;

        let now = Utc::now();

        Ok(Self {
            id,
            email: new.email,
            full_name: new.full_name,
            phone: new.phone,
            wilaya: new.wilaya,
            team_name: new.team_name,
            is_team_leader: new.is_team_leader,
            team_code: new.team_code,
            experience_level: new.experience_level,
            technical_skills: new.technical_skills,
            shirt_size: new.shirt_size,
            linkedin_profile: new.linkedin_profile,
            github_profile: new.github_profile,
            motivation_letter: new.motivation_letter,
            heard_about_us: new.heard_about_us,
            hackathon_experience: new.hackathon_experience,
            is_verified: false,
            verification_token: None,
            verification_token_expires: None,
            attendance_status: AttendanceStatus::Absent,
            created_at: now,
            updated_at: now,
        })
    }

    /// Rebuild a participant from stored state
    pub fn restore(stored: StoredParticipant) -> Self {
        Self {
            id: stored.id,
            email: stored.email,
            full_name: stored.full_name,
            phone: stored.phone,
            wilaya: stored.wilaya,
            team_name: stored.team_name,
            is_team_leader: stored.is_team_leader,
            team_code: stored.team_code,
            experience_level: stored.experience_level,
            technical_skills: stored.technical_skills,
            shirt_size: stored.shirt_size,
            linkedin_profile: stored.linkedin_profile,
            github_profile: stored.github_profile,
            motivation_letter: stored.motivation_letter,
            heard_about_us: stored.heard_about_us,
            hackathon_experience: stored.hackathon_experience,
            is_verified: stored.is_verified,
            verification_token: stored.verification_token,
            verification_token_expires: stored.verification_token_expires,
            attendance_status: stored.attendance_status,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &ParticipantId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn wilaya(&self) -> &str {
        &self.wilaya
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn is_team_leader(&self) -> bool {
        self.is_team_leader
    }

    pub fn team_code(&self) -> Option<&str> {
        self.team_code.as_deref()
    }

    pub fn experience_level(&self) -> ExperienceLevel {
        self.experience_level
    }

    pub fn technical_skills(&self) -> &[String] {
        &self.technical_skills
    }

    pub fn shirt_size(&self) -> ShirtSize {
        self.shirt_size
    }

    pub fn linkedin_profile(&self) -> &str {
        &self.linkedin_profile
    }

    pub fn github_profile(&self) -> &str {
        &self.github_profile
    }

    pub fn motivation_letter(&self) -> &str {
        &self.motivation_letter
    }

    pub fn heard_about_us(&self) -> &str {
        &self.heard_about_us
    }

    pub fn hackathon_experience(&self) -> &str {
        &self.hackathon_experience
    }

    pub fn is_verified(&self) -> bool {
        self.is_verified
    }

    pub fn verification_token(&self) -> Option<&str> {
        self.verification_token.as_deref()
    }

    pub fn verification_token_expires(&self) -> Option<DateTime<Utc>> {
        self.verification_token_expires
    }

    pub fn attendance_status(&self) -> AttendanceStatus {
        self.attendance_status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Check whether the stored verification token matches and is unexpired
    pub fn token_is_valid(&self, token: &str, now: DateTime<Utc>) -> bool {
        match (&self.verification_token, self.verification_token_expires) {
            (Some(stored), Some(expires)) => stored == token && expires > now,
            _ => false,
        }
    }

    // Mutators

    /// Attach a new verification token, invalidating any previous one
    pub fn set_verification_token(&mut self, token: String, expires_at: DateTime<Utc>) {
        self.verification_token = Some(token);
        self.verification_token_expires = Some(expires_at);
        self.touch();
    }

    /// Mark the email verified and clear the single-use token
    pub fn mark_verified(&mut self) {
        self.is_verified = true;
        self.verification_token = None;
        self.verification_token_expires = None;
        self.touch();
    }

    /// Attach the team code once membership is finalized
    pub fn set_team_code(&mut self, code: impl Into<String>) {
        self.team_code = Some(code.into());
        self.touch();
    }

    pub fn set_team_name(&mut self, name: impl Into<String>) {
        self.team_name = name.into();
        self.touch();
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), ParticipantValidationError> {
        let email = email.into();
        validate_email(&email)?;
        self.email = email;
        self.touch();
        Ok(())
    }

    pub fn set_full_name(
        &mut self,
        name: impl Into<String>,
    ) -> Result<(), ParticipantValidationError> {
        let name = name.into();
        validate_full_name(&name)?;
        self.full_name = name;
        self.touch();
        Ok(())
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) -> Result<(), ParticipantValidationError> {
        let phone = phone.into();
        validate_phone(&phone)?;
        self.phone = phone;
        self.touch();
        Ok(())
    }

    pub fn set_wilaya(
        &mut self,
        wilaya: impl Into<String>,
    ) -> Result<(), ParticipantValidationError> {
        let wilaya = wilaya.into();
        validate_wilaya(&wilaya)?;
        self.wilaya = wilaya;
        self.touch();
        Ok(())
    }

    pub fn set_experience_level(&mut self, level: ExperienceLevel) {
        self.experience_level = level;
        self.touch();
    }

    pub fn set_technical_skills(&mut self, skills: Vec<String>) {
        self.technical_skills = skills;
        self.touch();
    }

    pub fn set_shirt_size(&mut self, size: ShirtSize) {
        self.shirt_size = size;
        self.touch();
    }

    pub fn set_linkedin_profile(&mut self, url: impl Into<String>) {
        self.linkedin_profile = url.into();
        self.touch();
    }

    pub fn set_github_profile(&mut self, url: impl Into<String>) {
        self.github_profile = url.into();
        self.touch();
    }

    pub fn set_motivation_letter(&mut self, text: impl Into<String>) {
        self.motivation_letter = text.into();
        self.touch();
    }

    pub fn set_heard_about_us(&mut self, text: impl Into<String>) {
        self.heard_about_us = text.into();
        self.touch();
    }

    pub fn set_hackathon_experience(&mut self, text: impl Into<String>) {
        self.hackathon_experience = text.into();
        self.touch();
    }

    /// Record event attendance; re-checking in is a state-level no-op
    pub fn check_in(&mut self) {
        if self.attendance_status != AttendanceStatus::Attended {
            self.attendance_status = AttendanceStatus::Attended;
            self.touch();
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
pub(crate) fn test_new_participant(email: &str, team_name: &str, leader: bool) -> NewParticipant {
    NewParticipant {
        email: email.to_string(),
        full_name: "Test Participant".to_string(),
        phone: "0550123456".to_string(),
        wilaya: "Algiers".to_string(),
        team_name: team_name.to_string(),
        is_team_leader: leader,
        team_code: None,
        experience_level: ExperienceLevel::Intermediate,
        technical_skills: vec!["rust".to_string()],
        shirt_size: ShirtSize::M,
        linkedin_profile: String::new(),
        github_profile: String::new(),
        motivation_letter: String::new(),
        heard_about_us: String::new(),
        hackathon_experience: String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_participant_defaults() {
        let p = Participant::new(
            ParticipantId::generate(),
            test_new_participant("lead@example.com", "Alpha", true),
        )
        .unwrap();

        assert!(!p.is_verified());
        assert!(p.verification_token().is_none());
        assert!(p.team_code().is_none());
        assert_eq!(p.attendance_status(), AttendanceStatus::Absent);
        assert!(p.is_team_leader());
    }

    #[test]
    fn test_new_participant_invalid_email() {
        let mut new = test_new_participant("bad-email", "Alpha", false);
        new.team_code = Some("ABC123".to_string());

        let result = Participant::new(ParticipantId::generate(), new);
        assert_eq!(result.unwrap_err(), ParticipantValidationError::InvalidEmail);
    }

    #[test]
    fn test_token_lifecycle() {
        let mut p = Participant::new(
            ParticipantId::generate(),
            test_new_participant("a@example.com", "Alpha", true),
        )
        .unwrap();

        let expires = Utc::now() + chrono::Duration::hours(24);
        p.set_verification_token("deadbeef".to_string(), expires);

        assert!(p.token_is_valid("deadbeef", Utc::now()));
        assert!(!p.token_is_valid("wrong", Utc::now()));
        assert!(!p.token_is_valid("deadbeef", expires + chrono::Duration::seconds(1)));

        p.mark_verified();
        assert!(p.is_verified());
        assert!(p.verification_token().is_none());
        assert!(!p.token_is_valid("deadbeef", Utc::now()));
    }

    #[test]
    fn test_resend_invalidates_previous_token() {
        let mut p = Participant::new(
            ParticipantId::generate(),
            test_new_participant("a@example.com", "Alpha", true),
        )
        .unwrap();

        let expires = Utc::now() + chrono::Duration::hours(24);
        p.set_verification_token("first".to_string(), expires);
        p.set_verification_token("second".to_string(), expires);

        assert!(!p.token_is_valid("first", Utc::now()));
        assert!(p.token_is_valid("second", Utc::now()));
    }

    #[test]
    fn test_check_in_idempotent() {
        let mut p = Participant::new(
            ParticipantId::generate(),
            test_new_participant("a@example.com", "Alpha", false),
        )
        .unwrap();

        p.check_in();
        assert!(p.attendance_status().is_attended());
        let after_first = p.updated_at();

        p.check_in();
        assert_eq!(p.updated_at(), after_first);
    }

    #[test]
    fn test_serialization_hides_token() {
        let mut p = Participant::new(
            ParticipantId::generate(),
            test_new_participant("a@example.com", "Alpha", true),
        )
        .unwrap();
        p.set_verification_token("secret-token".to_string(), Utc::now());

        let json = serde_json::to_string(&p).unwrap();
        assert!(!json.contains("secret-token"));
        assert!(!json.contains("verification_token"));
    }

    #[test]
    fn test_shirt_size_serialization() {
        assert_eq!(serde_json::to_string(&ShirtSize::XL).unwrap(), "\"XL\"");
        assert_eq!(
            serde_json::to_string(&ExperienceLevel::Beginner).unwrap(),
            "\"beginner\""
        );
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Attended).unwrap(),
            "\"Attended\""
        );
    }
}
