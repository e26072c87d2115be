//! Participant registration endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse, Json};
use crate::domain::participant::{
    AttendanceStatus, ExperienceLevel, NewParticipant, Participant, ParticipantId, ShirtSize,
};
use crate::infrastructure::registration::ParticipantUpdate;

/// Create the participants router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/verify-email/{token}", get(verify_email))
        .route(
            "/resend-verification-email/{id}",
            post(resend_verification_email),
        )
        .route("/get-all-participants", get(get_all_participants))
        .route("/get-participant-by-id/{id}", get(get_participant_by_id))
        .route("/get-participants-by-name", get(get_participants_by_name))
        .route("/update-participant/{id}", put(update_participant))
}

/// Registration request body
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "Full name is required"))]
    pub full_name: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone: String,
    #[validate(length(min = 1, message = "Wilaya is required"))]
    pub wilaya: String,
    #[validate(length(min = 1, message = "Team name is required"))]
    pub team_name: String,
    #[serde(default)]
    pub is_team_leader: bool,
    #[serde(default)]
    pub team_code: Option<String>,
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub technical_skills: Vec<String>,
    pub shirt_size: ShirtSize,
    #[serde(default)]
    pub linkedin_profile: String,
    #[serde(default)]
    pub github_profile: String,
    #[serde(default)]
    pub motivation_letter: String,
    #[serde(default)]
    pub heard_about_us: String,
    #[serde(default)]
    pub hackathon_experience: String,
}

impl From<RegisterRequest> for NewParticipant {
    fn from(request: RegisterRequest) -> Self {
        Self {
            email: request.email,
            full_name: request.full_name,
            phone: request.phone,
            wilaya: request.wilaya,
            team_name: request.team_name,
            is_team_leader: request.is_team_leader,
            team_code: request.team_code,
            experience_level: request.experience_level,
            technical_skills: request.technical_skills,
            shirt_size: request.shirt_size,
            linkedin_profile: request.linkedin_profile,
            github_profile: request.github_profile,
            motivation_letter: request.motivation_letter,
            heard_about_us: request.heard_about_us,
            hackathon_experience: request.hackathon_experience,
        }
    }
}

/// Partial update body; team code changes re-home the participant
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateParticipantRequest {
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

impl From<UpdateParticipantRequest> for ParticipantUpdate {
    fn from(request: UpdateParticipantRequest) -> Self {
        Self {
            email: request.email,
            full_name: request.full_name,
            phone: request.phone,
            wilaya: request.wilaya,
            experience_level: request.experience_level,
            technical_skills: request.technical_skills,
            shirt_size: request.shirt_size,
            linkedin_profile: request.linkedin_profile,
            github_profile: request.github_profile,
            motivation_letter: request.motivation_letter,
            heard_about_us: request.heard_about_us,
            hackathon_experience: request.hackathon_experience,
            team_code: request.team_code,
        }
    }
}

/// Participant as exposed by the API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub wilaya: String,
    pub team_name: String,
    pub is_team_leader: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
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
    pub attendance_status: AttendanceStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Participant> for ParticipantResponse {
    fn from(p: &Participant) -> Self {
        Self {
            id: p.id().as_str().to_string(),
            full_name: p.full_name().to_string(),
            email: p.email().to_string(),
            phone: p.phone().to_string(),
            wilaya: p.wilaya().to_string(),
            team_name: p.team_name().to_string(),
            is_team_leader: p.is_team_leader(),
            team_code: p.team_code().map(String::from),
            experience_level: p.experience_level(),
            technical_skills: p.technical_skills().to_vec(),
            shirt_size: p.shirt_size(),
            linkedin_profile: p.linkedin_profile().to_string(),
            github_profile: p.github_profile().to_string(),
            motivation_letter: p.motivation_letter().to_string(),
            heard_about_us: p.heard_about_us().to_string(),
            hackathon_experience: p.hackathon_experience().to_string(),
            is_verified: p.is_verified(),
            attendance_status: p.attendance_status(),
            created_at: p.created_at().to_rfc3339(),
            updated_at: p.updated_at().to_rfc3339(),
        }
    }
}

/// POST /api/participants/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ParticipantResponse>>), ApiError> {
    request.validate()?;

    let participant = state
        .registration_service
        .register(request.into())
        .await
        .map_err(ApiError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::data(ParticipantResponse::from(&participant)).with_message(
                "Participant created successfully. Please check your email to verify your account.",
            ),
        ),
    ))
}

/// GET /api/participants/verify-email/:token
pub async fn verify_email(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .registration_service
        .verify(&token)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::message("Email verified successfully!")))
}

/// POST /api/participants/resend-verification-email/:id
pub async fn resend_verification_email(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .registration_service
        .resend_verification(&ParticipantId::new(id))
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::message(
        "Verification email sent successfully",
    )))
}

/// GET /api/participants/get-all-participants
pub async fn get_all_participants(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ParticipantResponse>>>, ApiError> {
    let participants = state
        .registration_service
        .list()
        .await
        .map_err(ApiError::from)?;

    let responses: Vec<ParticipantResponse> =
        participants.iter().map(ParticipantResponse::from).collect();
    let count = responses.len();

    Ok(Json(ApiResponse::data(responses).with_count(count)))
}

/// GET /api/participants/get-participant-by-id/:id
pub async fn get_participant_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ParticipantResponse>>, ApiError> {
    let participant = state
        .registration_service
        .get(&ParticipantId::new(id))
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::data(ParticipantResponse::from(&participant))))
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

/// GET /api/participants/get-participants-by-name?name=
pub async fn get_participants_by_name(
    State(state): State<AppState>,
    Query(query): Query<NameQuery>,
) -> Result<Json<ApiResponse<Vec<ParticipantResponse>>>, ApiError> {
    let name = query
        .name
        .ok_or_else(|| ApiError::bad_request("Name parameter is required"))?;

    let participants = state
        .registration_service
        .search_by_name(&name)
        .await
        .map_err(ApiError::from)?;

    let responses: Vec<ParticipantResponse> =
        participants.iter().map(ParticipantResponse::from).collect();
    let count = responses.len();

    Ok(Json(ApiResponse::data(responses).with_count(count)))
}

/// PUT /api/participants/update-participant/:id
pub async fn update_participant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateParticipantRequest>,
) -> Result<Json<ApiResponse<ParticipantResponse>>, ApiError> {
    let participant = state
        .registration_service
        .update(&ParticipantId::new(id), request.into())
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::data(ParticipantResponse::from(&participant))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_deserialization() {
        let json = r#"{
            "fullName": "Amel Benali",
            "email": "amel@example.com",
            "phone": "0550123456",
            "wilaya": "Algiers",
            "teamName": "Alpha",
            "isTeamLeader": true,
            "experienceLevel": "advanced",
            "shirtSize": "M"
        }"#;

        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.full_name, "Amel Benali");
        assert!(request.is_team_leader);
        assert!(request.team_code.is_none());
        assert_eq!(request.experience_level, ExperienceLevel::Advanced);
        assert!(request.technical_skills.is_empty());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_register_request_member_with_code() {
        let json = r#"{
            "fullName": "Yanis Arab",
            "email": "yanis@example.com",
            "phone": "0550123457",
            "wilaya": "Oran",
            "teamName": "Alpha",
            "isTeamLeader": false,
            "teamCode": "ABC123",
            "experienceLevel": "beginner",
            "shirtSize": "L",
            "technicalSkills": ["python", "sql"]
        }"#;

        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.team_code.as_deref(), Some("ABC123"));
        assert_eq!(request.technical_skills.len(), 2);
    }

    #[test]
    fn test_register_request_validation_messages() {
        let json = r#"{
            "fullName": "",
            "email": "not-an-email",
            "phone": "0550123456",
            "wilaya": "Algiers",
            "teamName": "Alpha",
            "experienceLevel": "beginner",
            "shirtSize": "S"
        }"#;

        let request: RegisterRequest = serde_json::from_str(json).unwrap();
        let errors = request.validate().unwrap_err();
        let api_error = ApiError::from(errors);

        let messages = api_error.error.as_array().unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_update_request_partial() {
        let json = r#"{"teamCode": "XYZ789"}"#;

        let request: UpdateParticipantRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.team_code.as_deref(), Some("XYZ789"));
        assert!(request.full_name.is_none());
    }

    #[test]
    fn test_participant_response_serialization() {
        use crate::domain::participant::test_new_participant;

        let participant = Participant::new(
            ParticipantId::new("p-1"),
            test_new_participant("a@example.com", "Alpha", true),
        )
        .unwrap();

        let json = serde_json::to_string(&ParticipantResponse::from(&participant)).unwrap();

        assert!(json.contains("\"fullName\":"));
        assert!(json.contains("\"isTeamLeader\":true"));
        assert!(json.contains("\"attendanceStatus\":\"Absent\""));
        assert!(!json.contains("teamCode"));
    }
}
