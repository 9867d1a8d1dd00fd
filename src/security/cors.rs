//! CORS headers for `/api/` routes.
//!
//! The request origin is reflected only when it is on the active allow-list.
//! There is no wildcard fallback: an unknown origin simply gets no
//! `Access-Control-Allow-Origin` header. Methods and allowed headers are sent
//! regardless of the origin check.

use std::collections::HashSet;

use axum::http::header::{self, HeaderName, HeaderValue};

pub const ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";

/// Allow-list for a single environment.
#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    allowed: HashSet<String>,
}

impl CorsPolicy {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: origins.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        self.allowed.contains(origin)
    }

    /// Headers to attach for an API request carrying `origin`.
    pub fn headers_for(&self, origin: Option<&str>) -> Vec<(HeaderName, HeaderValue)> {
        let mut headers = Vec::with_capacity(3);

        if let Some(origin) = origin.filter(|o| self.allows(o)) {
            if let Ok(value) = HeaderValue::from_str(origin) {
                headers.push((header::ACCESS_CONTROL_ALLOW_ORIGIN, value));
            }
        }

        headers.push((
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        ));
        headers.push((
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOW_HEADERS),
        ));

        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> CorsPolicy {
        CorsPolicy::new(["http://localhost:3000"])
    }

    #[test]
    fn test_reflects_allowed_origin() {
        let headers = policy().headers_for(Some("http://localhost:3000"));
        assert_eq!(headers.len(), 3);
        assert_eq!(headers[0].0, header::ACCESS_CONTROL_ALLOW_ORIGIN);
        assert_eq!(headers[0].1, "http://localhost:3000");
    }

    #[test]
    fn test_unknown_origin_gets_no_allow_origin() {
        for origin in [Some("https://evil.example"), None] {
            let headers = policy().headers_for(origin);
            assert_eq!(headers.len(), 2);
            assert!(headers
                .iter()
                .all(|(name, _)| name != header::ACCESS_CONTROL_ALLOW_ORIGIN));
        }
    }

    #[test]
    fn test_wildcard_is_not_special() {
        assert!(!policy().allows("*"));
        let headers = policy().headers_for(Some("*"));
        assert!(headers
            .iter()
            .all(|(_, value)| value != "*"));
    }
}
