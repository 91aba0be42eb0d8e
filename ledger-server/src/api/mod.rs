//! HTTP API
//!
//! One router per resource, nested under `/api/...`, all sharing
//! [`ServerState`].

pub mod customers;
pub mod health;
pub mod neighborhoods;
pub mod orders;
pub mod products;
pub mod registers;
pub mod reports;
pub mod tables;

use axum::Router;

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(products::router())
        .merge(neighborhoods::router())
        .merge(customers::router())
        .merge(registers::router())
        .merge(orders::router())
        .merge(tables::router())
        .merge(reports::router())
}
