//! Table Sale API module (table service)

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/tables", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::open))
        .route("/open", get(handler::list_open))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/items", put(handler::set_items))
        .route("/{id}/close", post(handler::close))
        .route("/{id}/cancel", post(handler::cancel))
}
