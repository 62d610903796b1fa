use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::AppState;
use crate::utils::error::{AppError, AppResult};

#[derive(Deserialize)]
pub struct ReplyRequest {
    pub text: String,
}

#[derive(Serialize, Deserialize)]
pub struct ReplyResponse {
    pub reply: String,
}

async fn reply(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReplyRequest>, JsonRejection>,
) -> AppResult<Json<ReplyResponse>> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let reply = state.orchestrator.generate_reply(&req.text).await;

    Ok(Json(ReplyResponse { reply }))
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/reply", post(reply))
        .with_state(state)
}
