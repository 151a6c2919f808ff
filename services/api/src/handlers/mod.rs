pub mod auth;
pub mod category;
pub mod order;
pub mod order_line;
pub mod product;
pub mod user;
