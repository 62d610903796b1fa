use axum::{Router, extract::DefaultBodyLimit};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::api::AppState;
use crate::services::reply::ReplyOrchestrator;
use crate::services::rewriter::RewriteCapability;
use crate::utils::config::AppConfig;

const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn register_routes(config: &AppConfig) -> Router {
    let capability = RewriteCapability::from_config(&config.rewrite);

    match &capability {
        RewriteCapability::Available(rewriter) => {
            tracing::info!("Replies are rewritten by model {}", rewriter.model_id());
        }
        RewriteCapability::Unavailable { reason } => {
            tracing::info!("Replies are rule-based ({})", reason);
        }
    }

    let state = Arc::new(AppState {
        orchestrator: ReplyOrchestrator::new(capability, config.rewrite.timeout),
    });

    build_router(state)
}

pub fn build_router(state: Arc<AppState>) -> Router {
    crate::api::routes(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
}
