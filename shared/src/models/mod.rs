//! Data models
//!
//! Shared between ledger-server and the storefront/back-office clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY, snowflake-generated).
//! All timestamps are Unix millis (`i64`).

pub mod cash_register;
pub mod cashback;
pub mod customer;
pub mod daily_report;
pub mod neighborhood;
pub mod order;
pub mod product;
pub mod table_sale;

// Re-exports
pub use cash_register::*;
pub use cashback::*;
pub use customer::*;
pub use daily_report::*;
pub use neighborhood::*;
pub use order::*;
pub use product::*;
pub use table_sale::*;
