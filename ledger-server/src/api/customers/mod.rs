//! Customer API module

mod handler;

use axum::{
    Router,
    routing::get,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/customers", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/search", get(handler::search))
        .route("/by-phone/{phone}", get(handler::get_by_phone))
        .route("/{id}", get(handler::get_by_id).put(handler::update))
        .route("/{id}/transactions", get(handler::transactions))
}
