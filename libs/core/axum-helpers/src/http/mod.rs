//! HTTP middleware module.
//!
//! Provides HTTP-level middleware for security headers. CORS is configured
//! directly in [`crate::server::create_router`] from the `CORS_ALLOWED_ORIGIN`
//! environment variable.

pub mod security;

pub use security::security_headers;
