//! Service plumbing shared by RestauSimplon crates: configuration loading,
//! the common error type, health handlers, request-id middleware, tracing
//! setup and serde helpers.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
