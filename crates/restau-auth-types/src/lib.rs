//! Authentication primitives shared by RestauSimplon crates.
//!
//! Provides JWT issuance/validation, the `BearerToken` extractor and password
//! hashing.

pub mod bearer;
pub mod password;
pub mod token;
