pub mod auth;
pub mod health;
pub mod meta;
pub mod product;
