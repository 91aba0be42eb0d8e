//! Report API module (daily/monthly rollups)

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/reports", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/daily", get(handler::list_daily).post(handler::generate_daily))
        .route("/daily/{date}", get(handler::get_daily))
        .route("/monthly/{month}", get(handler::monthly))
}
