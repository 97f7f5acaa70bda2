//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first in Router)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame denial, no-store)
//!
//! Authentication is not a layer: handlers ask for it through the
//! [`RequireAuth`] and [`OptionalAuth`] extractors.

pub mod auth;
pub mod request_id;
pub mod security_headers;

pub use auth::{AuthRejection, OptionalAuth, RequireAuth};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
