//! Profile API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/profile", profile_routes())
}

fn profile_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::get).patch(handler::update))
        .route(
            "/picture",
            get(handler::get_picture).patch(handler::update_picture),
        )
}
