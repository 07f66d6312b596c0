//! Test utilities for the campus market service.
//!
//! Session headers, request builders and the JSON fixture loader.
//! Import from tests only, never from production code.

pub mod auth;
pub mod fixture;
