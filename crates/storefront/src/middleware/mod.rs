//! HTTP middleware stack for the storefront edge.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors; added by the binary)
//! 2. CORS
//! 3. `TraceLayer` (request tracing)
//! 4. Request ID (add unique ID to each request)
//!
//! Credential checks are not a layer: they are extractors, so each handler
//! states exactly which credentials it demands.

pub mod auth;
pub mod request_id;

pub use auth::{AuthedUser, BearerAuth, CredentialPair, OptionalBearerAuth};
pub use request_id::request_id_middleware;
