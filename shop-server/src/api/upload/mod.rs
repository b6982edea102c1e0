//! Image Upload API Module

mod handler;

use axum::{
    Router,
    routing::post,
};

use crate::core::ServerState;

/// Upload router
pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/images",
        post(handler::upload).delete(handler::delete),
    )
}
