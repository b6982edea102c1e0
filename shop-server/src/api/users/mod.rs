//! User API Module
//!
//! Management surface only; authentication happens upstream.

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

/// User router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/roles", get(handler::list_roles))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/roles", put(handler::change_roles))
}
