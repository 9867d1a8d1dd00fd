//! Hub edge: request routing and CSV export for the hub sites.

pub mod config;
pub mod export;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::HubConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{Decision, EdgeRouter};
