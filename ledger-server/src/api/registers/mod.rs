//! Cash Register API module (caixa)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/registers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::open))
        .route("/current", get(handler::get_current))
        .route("/entries", post(handler::add_entry))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/entries", get(handler::list_entries))
        .route("/{id}/summary", get(handler::summary))
        .route("/{id}/close", post(handler::close))
}
