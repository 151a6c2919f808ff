//! Domain types shared across RestauSimplon crates.
//!
//! Pure types only, no framework dependencies. Import in `usecase/` and
//! `domain/` layers.

pub mod money;
pub mod order;
pub mod user;
