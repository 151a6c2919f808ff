//! sea-orm entities for the RestauSimplon database.

pub mod categories;
pub mod order_lines;
pub mod orders;
pub mod products;
pub mod users;
