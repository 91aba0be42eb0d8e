//! Orchestration services
//!
//! Services own the multi-entity flows: they fetch the snapshot the pure
//! engines need, run the computation, and commit every resulting row in a
//! single database transaction.

pub mod checkout;
pub mod reporting;
pub mod tables;
