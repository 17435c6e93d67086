use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

use crate::skill::{SkillError, SkillRequest, SkillResponse};
use crate::state::AppState;

pub fn create_routes() -> Router<AppState> {
    Router::new()
        // Voice platform webhook
        .route("/api/Alexa", post(handle_skill_request))
        // Health check
        .route("/api/health", get(health_check))
}

async fn handle_skill_request(
    State(state): State<AppState>,
    Json(request): Json<SkillRequest>,
) -> Result<Json<SkillResponse>, SkillError> {
    let response = state.dispatcher.handle_request(&request).await?;
    Ok(Json(response))
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
