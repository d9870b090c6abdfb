//! Order API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::submit))
        .route("/{id}/status", axum::routing::put(handler::update_status))
        .route("/{id}", axum::routing::delete(handler::delete))
}
