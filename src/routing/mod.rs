//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, cookies, origin)
//!     → matcher.rs (bypass check, prefix matching)
//!     → router.rs (gate evaluation in priority order)
//!     → Return: Redirect or Forward { headers }
//!
//! Router Compilation (at startup):
//!     HubConfig
//!     → RouterSettings (prefix matchers, app maps, active CORS list)
//!     → Freeze as immutable EdgeRouter
//! ```
//!
//! # Design Decisions
//! - Settings compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same decision
//! - First gate wins

pub mod matcher;
pub mod router;

pub use matcher::is_bypassed;
pub use router::{parse_cookie_header, Decision, EdgeRouter, RedirectReason, RequestFacts, RouterSettings};
