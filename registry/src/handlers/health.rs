use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
}

/// Simple health check endpoint.
///
/// Always 200 so a load balancer can tell the process is up; the database
/// state is reported in the body.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let db_status = if state.players.ping().await.is_ok() {
        "Connected"
    } else {
        "Disconnected"
    };

    let response = HealthResponse {
        status: "Player Registry is Healthy!".to_string(),
        database: db_status.to_string(),
    };

    (StatusCode::OK, Json(response))
}
