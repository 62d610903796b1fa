pub mod health;
pub mod reply;

use axum::Router;
use std::sync::Arc;

use crate::services::reply::ReplyOrchestrator;

pub struct AppState {
    pub orchestrator: ReplyOrchestrator,
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::routes(state.clone()))
        .merge(reply::routes(state))
}
