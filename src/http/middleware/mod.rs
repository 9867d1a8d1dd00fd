//! Request middleware.

pub mod edge_router;

pub use edge_router::{edge_router_middleware, EdgeState};
