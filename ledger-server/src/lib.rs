//! Açaí ledger server
//!
//! Storefront/back-office ledger for a food-retail store: cart pricing,
//! delivery fees, cashback accrual and redemption, cash register
//! reconciliation, and daily/monthly report rollups, over SQLite with a
//! thin HTTP API.

pub mod api;
pub mod cashback;
pub mod core;
pub mod db;
pub mod delivery;
pub mod money;
pub mod pricing;
pub mod registers;
pub mod reports;
pub mod services;
pub mod utils;

pub use crate::core::{Config, Server, ServerState};

/// Load .env and initialize logging. Call once at process start.
pub fn setup_environment() {
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let log_dir = std::env::var("LOG_DIR").ok();
    utils::logger::init_logger_with_file(Some(&log_level), log_dir.as_deref());
}
