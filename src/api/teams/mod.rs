//! Team endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::participants::ParticipantResponse;
use crate::api::state::AppState;
use crate::api::types::{ApiError, ApiResponse, Json};
use crate::domain::participant::ParticipantId;
use crate::domain::team::{Team, TeamId};
use crate::infrastructure::team::{CreateTeamRequest, UpdateTeamRequest};

/// Create the teams router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_team))
        .route("/get-all-teams", get(get_all_teams))
        .route("/get-team-by-id/{id}", get(get_team_by_id))
        .route("/by-code/{code}", get(get_team_by_code))
        .route("/validate-code", post(validate_team_code))
        .route("/update-team/{id}", put(update_team))
        .route("/stats", get(team_stats))
}

/// Request to create a team directly
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamApiRequest {
    pub name: String,
    #[serde(default)]
    pub team_code: Option<String>,
    pub team_leader: String,
    #[serde(default)]
    pub participants: Vec<String>,
}

/// Request to update a team
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTeamApiRequest {
    pub name: Option<String>,
    pub status: Option<String>,
}

/// Team with its membership populated
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub id: String,
    pub name: String,
    pub team_code: String,
    pub team_leader: String,
    pub participants: Vec<ParticipantResponse>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Compact view returned by the by-code lookup
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummaryResponse {
    pub name: String,
    pub code: String,
    pub member_count: usize,
    pub team_leader: Option<MemberSummary>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSummary {
    pub full_name: String,
    pub email: String,
}

/// Resolve member records for a team, skipping ids with no participant
pub(crate) async fn populate_team(state: &AppState, team: &Team) -> Result<TeamResponse, ApiError> {
    let mut participants = Vec::with_capacity(team.member_count());

    for member in team.members() {
        if let Ok(participant) = state.registration_service.get(member).await {
            participants.push(ParticipantResponse::from(&participant));
        }
    }

    Ok(TeamResponse {
        id: team.id().as_str().to_string(),
        name: team.name().to_string(),
        team_code: team.code().to_string(),
        team_leader: team.leader().as_str().to_string(),
        participants,
        status: team.status().to_string(),
        created_at: team.created_at().to_rfc3339(),
        updated_at: team.updated_at().to_rfc3339(),
    })
}

/// POST /api/teams
pub async fn create_team(
    State(state): State<AppState>,
    Json(request): Json<CreateTeamApiRequest>,
) -> Result<(StatusCode, Json<ApiResponse<TeamResponse>>), ApiError> {
    let team = state
        .team_service
        .create(CreateTeamRequest {
            name: request.name,
            code: request.team_code,
            leader: ParticipantId::new(request.team_leader),
            members: request.participants.into_iter().map(ParticipantId::new).collect(),
        })
        .await
        .map_err(ApiError::from)?;

    let response = populate_team(&state, &team).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::data(response))))
}

/// GET /api/teams/get-all-teams
pub async fn get_all_teams(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<TeamResponse>>>, ApiError> {
    let teams = state.team_service.list(None).await.map_err(ApiError::from)?;

    let mut responses = Vec::with_capacity(teams.len());

    for team in &teams {
        responses.push(populate_team(&state, team).await?);
    }

    let count = responses.len();

    Ok(Json(ApiResponse::data(responses).with_count(count)))
}

/// GET /api/teams/get-team-by-id/:id
pub async fn get_team_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<TeamResponse>>, ApiError> {
    let team = state
        .team_service
        .get(&TeamId::new(id))
        .await
        .map_err(ApiError::from)?;

    let response = populate_team(&state, &team).await?;

    Ok(Json(ApiResponse::data(response)))
}

/// GET /api/teams/by-code/:code
pub async fn get_team_by_code(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<ApiResponse<TeamSummaryResponse>>, ApiError> {
    let team = state
        .team_service
        .get_by_code(&code)
        .await
        .map_err(ApiError::from)?;

    let team_leader = state
        .registration_service
        .get(team.leader())
        .await
        .ok()
        .map(|leader| MemberSummary {
            full_name: leader.full_name().to_string(),
            email: leader.email().to_string(),
        });

    Ok(Json(ApiResponse::data(TeamSummaryResponse {
        name: team.name().to_string(),
        code: team.code().to_string(),
        member_count: team.member_count(),
        team_leader,
        status: team.status().to_string(),
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCodeRequest {
    #[serde(default)]
    pub team_code: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCodeResponse {
    pub team_name: String,
    pub member_count: usize,
}

/// POST /api/teams/validate-code
pub async fn validate_team_code(
    State(state): State<AppState>,
    Json(request): Json<ValidateCodeRequest>,
) -> Result<Json<ApiResponse<ValidateCodeResponse>>, ApiError> {
    let code = request
        .team_code
        .ok_or_else(|| ApiError::bad_request("Team code is required"))?;

    let team = state
        .team_service
        .validate_code_for_join(&code)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(
        ApiResponse::data(ValidateCodeResponse {
            team_name: team.name().to_string(),
            member_count: team.member_count(),
        })
        .with_message("Valid team code"),
    ))
}

/// PUT /api/teams/update-team/:id
pub async fn update_team(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTeamApiRequest>,
) -> Result<Json<ApiResponse<TeamResponse>>, ApiError> {
    let team = state
        .team_service
        .update(
            &TeamId::new(id),
            UpdateTeamRequest {
                name: request.name,
                status: request.status,
            },
        )
        .await
        .map_err(ApiError::from)?;

    let response = populate_team(&state, &team).await?;

    Ok(Json(ApiResponse::data(response)))
}

/// GET /api/teams/stats
pub async fn team_stats(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<serde_json::Value>>, ApiError> {
    let stats = state.team_service.stats().await.map_err(ApiError::from)?;

    let mut map = serde_json::Map::new();

    for (status, count) in stats.by_status {
        map.insert(status.to_string(), serde_json::json!(count));
    }

    map.insert("total".to_string(), serde_json::json!(stats.total));

    Ok(Json(ApiResponse::data(serde_json::Value::Object(map))))
}
