//! Shared plumbing for campus market binaries: configuration loading, the
//! common HTTP error type, session extractors, request-id/trace middleware
//! and tracing setup.

pub mod config;
pub mod error;
pub mod middleware;
pub mod session;
pub mod tracing;
