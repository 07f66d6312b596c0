//! Domain types shared across the campus market workspace.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never pull `axum` or storage
//! concerns in here.

pub mod error;
pub mod id;
pub mod product;
pub mod time;
pub mod user;
