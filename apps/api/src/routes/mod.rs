pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::optimize::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Optimization API
        .route("/api/v1/optimize", post(handlers::handle_optimize))
        .route("/api/v1/optimize/score", post(handlers::handle_score))
        .route("/api/v1/sections/locate", post(handlers::handle_locate))
        .route("/api/v1/projects/rank", post(handlers::handle_rank))
        .with_state(state)
}
