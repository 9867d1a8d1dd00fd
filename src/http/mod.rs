//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup)
//!     → request.rs (request ID set + propagated)
//!     → middleware/edge_router.rs (bypass check, router decision)
//!         → Redirect (307)
//!         → Forward: export.rs handlers or upstream proxy
//!     → annotate response (security, proxy, CORS, CSP headers)
//!     → Send to client
//! ```

pub mod export;
pub mod middleware;
pub mod request;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::HttpServer;
