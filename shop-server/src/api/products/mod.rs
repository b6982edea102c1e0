//! Product API Module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

/// Product router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        // All feedback across products; literal segment wins over `{id}`
        .route("/feedback", get(handler::all_feedback))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{id}/instances", post(handler::create_instance))
        .route("/{id}/instances/{instance_id}", put(handler::update_instance))
        .route(
            "/{id}/feedback",
            get(handler::list_feedback).post(handler::add_feedback),
        )
}
