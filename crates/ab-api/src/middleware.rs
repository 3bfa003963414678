//! anonboard/crates/ab-api/src/middleware.rs Middleware
//!
//! Request logging, CORS and response hardening.

use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};

/// Returns the request logger for the API.
pub fn standard_middleware() -> Logger {
    // We use the 'default' logger which outputs:
    // remote-ip "request-line" status-code response-size "referrer" "user-agent"
    Logger::default()
}

/// Configures CORS (Cross-Origin Resource Sharing).
/// The API is public, so any origin may call every board route.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allow_any_header()
        .max_age(3600)
}

/// Headers added to every response: no framing from other origins,
/// no DNS prefetching, referrer only sent same-origin, no MIME sniffing.
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Frame-Options", "SAMEORIGIN"))
        .add(("X-DNS-Prefetch-Control", "off"))
        .add(("Referrer-Policy", "same-origin"))
        .add(("X-Content-Type-Options", "nosniff"))
}
