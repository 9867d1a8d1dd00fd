//! Static security response headers.
//!
//! # Responsibilities
//! - Fixed security header set attached to every forwarded response
//! - Content-Security-Policy directive set per environment
//!
//! # Design Decisions
//! - Values are compile-time constants; nothing here inspects the request
//! - CSP is applied by the server only when a response lacks one

use axum::http::header::{HeaderName, HeaderValue};

use crate::config::Environment;

pub const X_FRAME_OPTIONS: &str = "DENY";
pub const X_CONTENT_TYPE_OPTIONS: &str = "nosniff";
pub const REFERRER_POLICY: &str = "strict-origin-when-cross-origin";
pub const PERMISSIONS_POLICY: &str = "camera=(), microphone=(), geolocation=()";

const CSP_DIRECTIVES: &[&str] = &[
    "default-src 'self'",
    "script-src 'self' 'unsafe-eval' 'unsafe-inline'",
    "style-src 'self' 'unsafe-inline'",
    "img-src 'self' data: blob: https:",
    "font-src 'self' data:",
    "connect-src 'self' https: wss:",
    "frame-ancestors 'none'",
    "base-uri 'self'",
    "form-action 'self'",
];

/// The security headers attached to every forwarded response.
pub fn security_headers() -> [(HeaderName, HeaderValue); 4] {
    [
        (
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static(X_FRAME_OPTIONS),
        ),
        (
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static(X_CONTENT_TYPE_OPTIONS),
        ),
        (
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static(REFERRER_POLICY),
        ),
        (
            HeaderName::from_static("permissions-policy"),
            HeaderValue::from_static(PERMISSIONS_POLICY),
        ),
    ]
}

/// Content-Security-Policy value for the given environment.
///
/// Production additionally upgrades insecure subresource requests.
pub fn content_security_policy(environment: Environment) -> String {
    let mut directives: Vec<&str> = CSP_DIRECTIVES.to_vec();
    if environment.is_production() {
        directives.push("upgrade-insecure-requests");
    }
    directives.join("; ")
}
