use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use tower_http::trace::TraceLayer;

use super::state::AppState;
use super::types::ApiErrorBody;
use super::{admin, health, participants, teams};

/// Create the full application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health::health_check))
        .nest("/api/participants", participants::router())
        .nest("/api/teams", teams::router())
        .nest("/api/admin", admin::router())
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn root() -> &'static str {
    "Hackathon Registration API"
}

/// Unmatched routes get the envelope, not a bare 404
async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiErrorBody {
            success: false,
            error: serde_json::Value::String("Route not found".to_string()),
        }),
    )
}
