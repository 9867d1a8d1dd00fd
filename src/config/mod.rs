//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, HUB_ENV override)
//!     → validation.rs (semantic checks)
//!     → HubConfig (validated, immutable)
//!     → resolved once into RouterSettings at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; nothing reads the environment per request
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{AppRoute, CorsConfig, Environment, HubConfig, ReleasedApp, RoutingConfig};
