//! Health check

use axum::{Router, routing::get};

use crate::core::ServerState;
use crate::utils::ApiResponse;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

async fn health() -> ApiResponse<()> {
    ApiResponse::ok()
}
