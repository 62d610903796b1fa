use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;
use std::sync::Arc;

use crate::api::AppState;

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    model: String,
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        model: state.orchestrator.capability().model_label().to_string(),
    })
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .with_state(state)
}
