//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate prefixes, app names and origins
//! - Detect apps that are both released and gated
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: HubConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::HubConfig;

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address `{0}`")]
    BindAddress(String),

    #[error("prefix `{0}` must start with `/`")]
    Prefix(String),

    #[error("app at `{0}` has an empty name")]
    EmptyAppName(String),

    #[error("app `{0}` is both released and coming soon")]
    AppConflict(String),

    #[error("at least one session cookie name is required")]
    NoSessionCookies,

    #[error("`{0}` is not a bare origin")]
    Origin(String),
}

pub fn validate_config(config: &HubConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    let routing = &config.routing;
    for prefix in &routing.protected_prefixes {
        if !prefix.starts_with('/') {
            errors.push(ValidationError::Prefix(prefix.clone()));
        }
    }

    if routing.session_cookies.iter().all(|c| c.trim().is_empty()) {
        errors.push(ValidationError::NoSessionCookies);
    }

    let mut gated = HashSet::new();
    for app in &routing.coming_soon {
        if !app.prefix.starts_with('/') {
            errors.push(ValidationError::Prefix(app.prefix.clone()));
        }
        if app.name.trim().is_empty() {
            errors.push(ValidationError::EmptyAppName(app.prefix.clone()));
        }
        if let Some(id) = app.prefix.strip_prefix("/app/") {
            gated.insert(id.trim_end_matches('/').to_string());
        }
    }

    for app in &routing.released_apps {
        if app.name.trim().is_empty() {
            errors.push(ValidationError::EmptyAppName(format!("/app/{}", app.id)));
        }
        if gated.contains(&app.id) {
            errors.push(ValidationError::AppConflict(app.id.clone()));
        }
    }

    let origins = config
        .cors
        .production_origins
        .iter()
        .chain(config.cors.development_origins.iter());
    for origin in origins {
        if !is_bare_origin(origin) {
            errors.push(ValidationError::Origin(origin.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// An origin is scheme + host (+ port) with nothing after it.
fn is_bare_origin(origin: &str) -> bool {
    match Url::parse(origin) {
        Ok(url) => url.has_host() && url.origin().ascii_serialization() == origin,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{AppRoute, ReleasedApp};

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&HubConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = HubConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.routing.protected_prefixes.push("dashboard".into());
        config.routing.session_cookies.clear();
        config.cors.production_origins.push("https://cybere.co/path".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::NoSessionCookies));
        assert!(errors.contains(&ValidationError::Prefix("dashboard".into())));
    }

    #[test]
    fn test_released_and_gated_conflict() {
        let mut config = HubConfig::default();
        config.routing.coming_soon.push(AppRoute {
            prefix: "/app/justsplit".into(),
            name: "JustSplit".into(),
        });
        config.routing.released_apps.push(ReleasedApp {
            id: "somos".into(),
            name: String::new(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::AppConflict("justsplit".into())));
        assert!(errors.contains(&ValidationError::AppConflict("somos".into())));
        assert!(errors.contains(&ValidationError::EmptyAppName("/app/somos".into())));
    }

    #[test]
    fn test_origin_shapes() {
        assert!(is_bare_origin("http://localhost:3000"));
        assert!(is_bare_origin("https://hub.cybere.co"));
        assert!(!is_bare_origin("https://hub.cybere.co/"));
        assert!(!is_bare_origin("*"));
    }
}
