//! Admin endpoints - auth, reporting, check-in and bulk notifications

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::participants::ParticipantResponse;
use crate::api::state::AppState;
use crate::api::teams::TeamResponse;
use crate::api::types::{ApiError, ApiResponse, Json};

/// Create the admin router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/resetPassword", post(reset_password))
        .route("/check-in", post(check_in))
        .route("/get-all-check-ins", get(get_all_check_ins))
        .route("/teams", get(get_teams))
        .route("/participants", get(get_participants))
        .route("/send-acceptance-email", post(send_acceptance_email))
        .route("/send-waitlist-notification", post(send_waitlist_notification))
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    /// Defaults to the email local part when absent
    pub username: Option<String>,
}

/// POST /api/admin/signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    let username = request.username.unwrap_or_else(|| {
        request
            .email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string()
    });

    state
        .admin_service
        .signup(&username, &request.email, &request.password)
        .await
        .map_err(ApiError::from)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message("Admin registered successfully")),
    ))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let token = state
        .admin_service
        .login(&request.email, &request.password)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::data(LoginResponse { token })))
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// POST /api/admin/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .admin_service
        .forgot_password(&request.email)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::message(
        "Reset password link sent to your email",
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: Option<String>,
    pub new_password: String,
}

/// POST /api/admin/resetPassword
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let token = request
        .token
        .ok_or_else(|| ApiError::bad_request("Token is required"))?;

    state
        .admin_service
        .reset_password(&token, &request.new_password)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::message(
        "Password has been reset successfully",
    )))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRequest {
    pub email: Option<String>,
    pub qr_code: Option<String>,
}

/// POST /api/admin/check-in
pub async fn check_in(
    State(state): State<AppState>,
    Json(request): Json<CheckInRequest>,
) -> Result<Json<ApiResponse<ParticipantResponse>>, ApiError> {
    let participant = state
        .admin_service
        .check_in(request.email.as_deref(), request.qr_code.as_deref())
        .await
        .map_err(ApiError::from)?;

    Ok(Json(
        ApiResponse::data(ParticipantResponse::from(&participant))
            .with_message("Participant checked in"),
    ))
}

/// GET /api/admin/get-all-check-ins
pub async fn get_all_check_ins(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ParticipantResponse>>>, ApiError> {
    let participants = state
        .admin_service
        .list_check_ins()
        .await
        .map_err(ApiError::from)?;

    let responses: Vec<ParticipantResponse> =
        participants.iter().map(ParticipantResponse::from).collect();
    let count = responses.len();

    Ok(Json(ApiResponse::data(responses).with_count(count)))
}

#[derive(Debug, Deserialize)]
pub struct TeamsQuery {
    pub status: Option<String>,
}

/// GET /api/admin/teams?status=
pub async fn get_teams(
    State(state): State<AppState>,
    Query(query): Query<TeamsQuery>,
) -> Result<Json<ApiResponse<Vec<TeamResponse>>>, ApiError> {
    let teams = state
        .team_service
        .list(query.status.as_deref())
        .await
        .map_err(ApiError::from)?;

    let mut responses = Vec::with_capacity(teams.len());

    for team in &teams {
        responses.push(crate::api::teams::populate_team(&state, team).await?);
    }

    let count = responses.len();

    Ok(Json(ApiResponse::data(responses).with_count(count)))
}

#[derive(Debug, Deserialize)]
pub struct ParticipantsQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantPageResponse {
    pub data: Vec<ParticipantResponse>,
    pub page: usize,
    pub total_pages: usize,
    pub total_participants: usize,
}

/// GET /api/admin/participants?page=&limit=
pub async fn get_participants(
    State(state): State<AppState>,
    Query(query): Query<ParticipantsQuery>,
) -> Result<Json<ApiResponse<ParticipantPageResponse>>, ApiError> {
    let page = state
        .registration_service
        .list_page(query.page.unwrap_or(1), query.limit.unwrap_or(5))
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ApiResponse::data(ParticipantPageResponse {
        data: page.participants.iter().map(ParticipantResponse::from).collect(),
        page: page.page,
        total_pages: page.total_pages,
        total_participants: page.total,
    })))
}

#[derive(Debug, Serialize)]
pub struct BulkSendResponse {
    pub count: usize,
    pub attempted: usize,
}

/// POST /api/admin/send-acceptance-email
pub async fn send_acceptance_email(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BulkSendResponse>>, ApiError> {
    let report = state
        .admin_service
        .send_acceptance_emails()
        .await
        .map_err(ApiError::from)?;

    Ok(Json(
        ApiResponse::data(BulkSendResponse {
            count: report.sent,
            attempted: report.attempted,
        })
        .with_message("Acceptance emails sent"),
    ))
}

/// POST /api/admin/send-waitlist-notification
pub async fn send_waitlist_notification(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<BulkSendResponse>>, ApiError> {
    let report = state
        .admin_service
        .send_waitlist_emails()
        .await
        .map_err(ApiError::from)?;

    Ok(Json(
        ApiResponse::data(BulkSendResponse {
            count: report.sent,
            attempted: report.attempted,
        })
        .with_message("Waitlist notifications sent"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_request_username_defaulting() {
        let request: SignupRequest =
            serde_json::from_str(r#"{"email": "org@example.com", "password": "pw"}"#).unwrap();
        assert!(request.username.is_none());

        let username = request.username.unwrap_or_else(|| {
            request.email.split('@').next().unwrap_or_default().to_string()
        });
        assert_eq!(username, "org");
    }

    #[test]
    fn test_check_in_request_variants() {
        let by_email: CheckInRequest =
            serde_json::from_str(r#"{"email": "p@example.com"}"#).unwrap();
        assert!(by_email.email.is_some());
        assert!(by_email.qr_code.is_none());

        let by_qr: CheckInRequest = serde_json::from_str(r#"{"qrCode": "p-1"}"#).unwrap();
        assert!(by_qr.qr_code.is_some());
    }

    #[test]
    fn test_reset_password_request() {
        let request: ResetPasswordRequest =
            serde_json::from_str(r#"{"token": "t", "newPassword": "new-password-1"}"#).unwrap();
        assert_eq!(request.token.as_deref(), Some("t"));
        assert_eq!(request.new_password, "new-password-1");
    }
}
