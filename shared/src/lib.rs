//! Shared domain types for the Açaí ledger workspace.
//!
//! This crate holds the entities and request/response payloads exchanged
//! between the ledger server and its clients. It performs no I/O; the `db`
//! feature only adds `sqlx` row derives for the server side.

pub mod models;
pub mod util;
