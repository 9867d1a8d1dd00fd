//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the hub edge.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the hub edge service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct HubConfig {
    /// Deployment environment (selects CORS allow-list and CSP directives).
    pub environment: Environment,

    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Origin that forwarded requests are sent to.
    pub upstream: UpstreamConfig,

    /// Protected routes, coming-soon gates and released apps.
    pub routing: RoutingConfig,

    /// CORS allow-lists per environment.
    pub cors: CorsConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// CSV export settings.
    pub export: ExportConfig,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }

    /// Parse the value of an environment override such as `HUB_ENV`.
    pub fn from_env_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Some(Environment::Production),
            "development" | "dev" | "test" => Some(Environment::Development),
            _ => None,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Production => write!(f, "production"),
            Environment::Development => write!(f, "development"),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Upstream origin configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Upstream address (e.g., "127.0.0.1:3000"). Unset means nothing is forwarded.
    pub address: Option<String>,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: None,
            connect_timeout_secs: 5,
        }
    }
}

/// An unreleased app gated behind the coming-soon page.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct AppRoute {
    /// Path prefix to match (e.g., "/app/somos").
    pub prefix: String,

    /// Canonical app name (e.g., "Somos").
    pub name: String,
}

/// A released app served behind the hub proxy.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ReleasedApp {
    /// Path segment after `/app/` (e.g., "justsplit").
    pub id: String,

    /// Canonical app name sent as `X-Target-App`.
    pub name: String,
}

/// Route gating configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Path prefixes that require a session cookie.
    pub protected_prefixes: Vec<String>,

    /// Cookie names recognized as a session.
    pub session_cookies: Vec<String>,

    /// Unreleased apps (checked in order).
    pub coming_soon: Vec<AppRoute>,

    /// Released apps.
    pub released_apps: Vec<ReleasedApp>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        let protected = [
            "/dashboard",
            "/apps",
            "/my-data",
            "/profile",
            "/settings",
            "/security",
            "/billing",
            "/auth-logs",
        ];
        let coming_soon = [
            ("/app/somos", "Somos"),
            ("/app/demos", "Demos"),
            ("/app/plantopia", "Plantopia"),
        ];

        Self {
            protected_prefixes: protected.iter().map(|p| p.to_string()).collect(),
            session_cookies: vec!["session".to_string(), "__session".to_string()],
            coming_soon: coming_soon
                .iter()
                .map(|(prefix, name)| AppRoute {
                    prefix: prefix.to_string(),
                    name: name.to_string(),
                })
                .collect(),
            released_apps: vec![ReleasedApp {
                id: "justsplit".to_string(),
                name: "JustSplit".to_string(),
            }],
        }
    }
}

/// CORS allow-lists. The active list is chosen by [`Environment`].
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    pub production_origins: Vec<String>,
    pub development_origins: Vec<String>,
}

impl CorsConfig {
    /// Origins allowed in the given environment.
    pub fn origins_for(&self, environment: Environment) -> &[String] {
        match environment {
            Environment::Production => &self.production_origins,
            Environment::Development => &self.development_origins,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            production_origins: vec![
                "https://cybere.co".to_string(),
                "https://hub.cybere.co".to_string(),
                "https://justsplit.cybere.co".to_string(),
            ],
            development_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:3001".to_string(),
                "http://localhost:3002".to_string(),
                "http://localhost:40000".to_string(),
            ],
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// CSV export configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory the CLI saves exports into.
    pub output_dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: ".".to_string(),
        }
    }
}
