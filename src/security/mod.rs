//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Forwarded request:
//!     → headers.rs (static security headers, CSP)
//!     → cors.rs (allow-list origin reflection for /api/)
//!     → attached to the response by the edge middleware
//! ```
//!
//! # Design Decisions
//! - No computation in header values beyond the origin check
//! - Fail closed: unknown origins are never reflected

pub mod cors;
pub mod headers;

pub use cors::CorsPolicy;
pub use headers::{content_security_policy, security_headers};
