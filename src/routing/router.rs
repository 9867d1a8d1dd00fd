//! Edge routing decisions.
//!
//! # Responsibilities
//! - Store compiled gates (protected prefixes, coming-soon apps, released apps)
//! - Decide redirect vs. forward for a request
//! - Collect the headers a forwarded response must carry
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Strict priority order: sign-in gate, coming-soon gate, forward
//! - Total: every request maps to exactly one decision

use std::collections::HashMap;

use axum::http::header::{self, HeaderName, HeaderValue};
use axum::http::Request;
use url::form_urlencoded;

use crate::config::{Environment, HubConfig};
use crate::routing::matcher::{app_segment, AnyPrefixMatcher, Matcher, PathPrefixMatcher};
use crate::security::{security_headers, CorsPolicy};

pub const X_HUB_PROXY: HeaderName = HeaderName::from_static("x-hub-proxy");
pub const X_TARGET_APP: HeaderName = HeaderName::from_static("x-target-app");

const API_PREFIX: &str = "/api/";
const SIGN_IN_PATH: &str = "/";
const COMING_SOON_PATH: &str = "/coming-soon";

/// Why a request was redirected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// Protected route without a session cookie.
    SignIn,
    /// Unreleased app.
    ComingSoon,
}

/// The outcome for a single request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Respond with `307 Temporary Redirect` to `location`.
    Redirect {
        location: String,
        reason: RedirectReason,
    },
    /// Pass the request on and attach `headers` to the response.
    Forward {
        headers: Vec<(HeaderName, HeaderValue)>,
    },
}

impl Decision {
    /// Metric/log label for this decision.
    pub fn outcome(&self) -> &'static str {
        match self {
            Decision::Redirect {
                reason: RedirectReason::SignIn,
                ..
            } => "sign_in",
            Decision::Redirect {
                reason: RedirectReason::ComingSoon,
                ..
            } => "coming_soon",
            Decision::Forward { .. } => "forward",
        }
    }
}

/// The parts of a request the router looks at.
#[derive(Debug, Clone, Default)]
pub struct RequestFacts {
    pub path: String,
    pub cookies: HashMap<String, String>,
    pub origin: Option<String>,
}

impl RequestFacts {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn from_request<B>(req: &Request<B>) -> Self {
        let mut cookies = HashMap::new();
        for value in req.headers().get_all(header::COOKIE) {
            if let Ok(raw) = value.to_str() {
                cookies.extend(parse_cookie_header(raw));
            }
        }

        let origin = req
            .headers()
            .get(header::ORIGIN)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        Self {
            path: req.uri().path().to_string(),
            cookies,
            origin,
        }
    }
}

/// Parse a `Cookie` header value into name/value pairs.
pub fn parse_cookie_header(raw: &str) -> impl Iterator<Item = (String, String)> + '_ {
    raw.split(';').filter_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some((name.to_string(), value.trim().trim_matches('"').to_string()))
    })
}

/// Router settings resolved once from [`HubConfig`].
#[derive(Debug, Clone)]
pub struct RouterSettings {
    pub environment: Environment,
    protected: AnyPrefixMatcher,
    session_cookies: Vec<String>,
    coming_soon: Vec<(PathPrefixMatcher, String)>,
    released: HashMap<String, HeaderValue>,
    cors: CorsPolicy,
}

impl RouterSettings {
    pub fn from_config(config: &HubConfig) -> Self {
        let routing = &config.routing;

        let coming_soon = routing
            .coming_soon
            .iter()
            .map(|app| (PathPrefixMatcher::new(app.prefix.clone()), app.name.to_lowercase()))
            .collect();

        let mut released = HashMap::new();
        for app in &routing.released_apps {
            match HeaderValue::from_str(&app.name) {
                Ok(value) => {
                    released.insert(app.id.clone(), value);
                }
                Err(_) => tracing::warn!(app = %app.id, "Released app name is not a valid header value"),
            }
        }

        Self {
            environment: config.environment,
            protected: AnyPrefixMatcher::new(routing.protected_prefixes.iter().cloned()),
            session_cookies: routing
                .session_cookies
                .iter()
                .filter(|c| !c.trim().is_empty())
                .cloned()
                .collect(),
            coming_soon,
            released,
            cors: CorsPolicy::new(config.cors.origins_for(config.environment).iter().cloned()),
        }
    }
}

/// The edge request router.
#[derive(Debug, Clone)]
pub struct EdgeRouter {
    settings: RouterSettings,
}

impl EdgeRouter {
    pub fn new(settings: RouterSettings) -> Self {
        Self { settings }
    }

    pub fn from_config(config: &HubConfig) -> Self {
        Self::new(RouterSettings::from_config(config))
    }

    pub fn settings(&self) -> &RouterSettings {
        &self.settings
    }

    /// Decide what to do with an HTTP request.
    pub fn decide_request<B>(&self, req: &Request<B>) -> Decision {
        self.decide(&RequestFacts::from_request(req))
    }

    /// Decide what to do with a request.
    pub fn decide(&self, facts: &RequestFacts) -> Decision {
        let path = facts.path.as_str();

        if self.settings.protected.matches(path) && !self.has_session(facts) {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("returnUrl", path)
                .finish();
            return Decision::Redirect {
                location: format!("{SIGN_IN_PATH}?{query}"),
                reason: RedirectReason::SignIn,
            };
        }

        if let Some((_, app)) = self.settings.coming_soon.iter().find(|(m, _)| m.matches(path)) {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("app", app)
                .finish();
            return Decision::Redirect {
                location: format!("{COMING_SOON_PATH}?{query}"),
                reason: RedirectReason::ComingSoon,
            };
        }

        let mut headers = Vec::new();

        if let Some(name) = app_segment(path).and_then(|id| self.settings.released.get(id)) {
            headers.push((X_HUB_PROXY, HeaderValue::from_static("true")));
            headers.push((X_TARGET_APP, name.clone()));
        }

        headers.extend(security_headers());

        if path.starts_with(API_PREFIX) {
            headers.extend(self.settings.cors.headers_for(facts.origin.as_deref()));
        }

        Decision::Forward { headers }
    }

    fn has_session(&self, facts: &RequestFacts) -> bool {
        self.settings.session_cookies.iter().any(|name| {
            facts
                .cookies
                .get(name)
                .map(|v| !v.is_empty())
                .unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn router() -> EdgeRouter {
        EdgeRouter::from_config(&HubConfig::default())
    }

    fn forwarded(decision: Decision) -> Vec<(HeaderName, HeaderValue)> {
        match decision {
            Decision::Forward { headers } => headers,
            other => panic!("expected forward, got {:?}", other),
        }
    }

    fn header<'a>(headers: &'a [(HeaderName, HeaderValue)], name: &str) -> Option<&'a HeaderValue> {
        headers.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    #[test]
    fn test_protected_route_without_session_redirects() {
        let decision = router().decide(&RequestFacts::new("/dashboard"));
        assert_eq!(
            decision,
            Decision::Redirect {
                location: "/?returnUrl=%2Fdashboard".to_string(),
                reason: RedirectReason::SignIn,
            }
        );
    }

    #[test]
    fn test_every_protected_prefix_is_gated() {
        for path in ["/apps", "/my-data/export", "/profile", "/settings", "/security", "/billing", "/auth-logs"] {
            let decision = router().decide(&RequestFacts::new(path));
            assert_eq!(decision.outcome(), "sign_in", "{path}");
        }
    }

    #[test]
    fn test_session_cookie_lets_request_through() {
        let decision = router().decide(&RequestFacts::new("/dashboard").with_cookie("session", "abc"));
        assert_eq!(decision.outcome(), "forward");

        let decision = router().decide(&RequestFacts::new("/dashboard").with_cookie("__session", "abc"));
        assert_eq!(decision.outcome(), "forward");
    }

    #[test]
    fn test_empty_or_unknown_cookie_is_not_a_session() {
        let decision = router().decide(&RequestFacts::new("/settings").with_cookie("session", ""));
        assert_eq!(decision.outcome(), "sign_in");

        let decision = router().decide(&RequestFacts::new("/settings").with_cookie("theme", "dark"));
        assert_eq!(decision.outcome(), "sign_in");
    }

    #[test]
    fn test_coming_soon_redirect() {
        let decision = router().decide(&RequestFacts::new("/app/somos"));
        assert_eq!(
            decision,
            Decision::Redirect {
                location: "/coming-soon?app=somos".to_string(),
                reason: RedirectReason::ComingSoon,
            }
        );

        let decision = router().decide(&RequestFacts::new("/app/demos/intro"));
        assert_eq!(decision.outcome(), "coming_soon");
    }

    #[test]
    fn test_protected_check_runs_first() {
        let mut config = HubConfig::default();
        config.routing.protected_prefixes.push("/app/somos".into());
        let decision = EdgeRouter::from_config(&config).decide(&RequestFacts::new("/app/somos"));
        assert_eq!(decision.outcome(), "sign_in");
    }

    #[test]
    fn test_released_app_gets_proxy_headers() {
        let headers = forwarded(router().decide(&RequestFacts::new("/app/justsplit/dashboard")));
        assert_eq!(header(&headers, "x-hub-proxy").unwrap(), "true");
        assert_eq!(header(&headers, "x-target-app").unwrap(), "JustSplit");
        assert_eq!(header(&headers, "x-frame-options").unwrap(), "DENY");
    }

    #[test]
    fn test_unknown_app_has_no_proxy_headers() {
        let headers = forwarded(router().decide(&RequestFacts::new("/app/unknown")));
        assert!(header(&headers, "x-hub-proxy").is_none());
        assert!(header(&headers, "x-target-app").is_none());
        assert_eq!(header(&headers, "x-content-type-options").unwrap(), "nosniff");
    }

    #[test]
    fn test_api_cors_uses_allow_list() {
        let facts = RequestFacts::new("/api/auth/login").with_origin("http://localhost:3000");
        let headers = forwarded(router().decide(&facts));
        assert_eq!(
            header(&headers, "access-control-allow-origin").unwrap(),
            "http://localhost:3000"
        );
        let methods = header(&headers, "access-control-allow-methods").unwrap().to_str().unwrap();
        assert!(methods.contains("POST") && methods.contains("GET"));

        let facts = RequestFacts::new("/api/auth/login").with_origin("https://hub.cybere.co");
        let headers = forwarded(router().decide(&facts));
        assert!(header(&headers, "access-control-allow-origin").is_none());
        assert!(header(&headers, "access-control-allow-headers").is_some());
    }

    #[test]
    fn test_production_uses_production_origins() {
        let mut config = HubConfig::default();
        config.environment = Environment::Production;
        let router = EdgeRouter::from_config(&config);

        let prod = RequestFacts::new("/api/data").with_origin("https://hub.cybere.co");
        let headers = forwarded(router.decide(&prod));
        assert_eq!(
            header(&headers, "access-control-allow-origin").unwrap(),
            "https://hub.cybere.co"
        );

        let dev = RequestFacts::new("/api/data").with_origin("http://localhost:3000");
        let headers = forwarded(router.decide(&dev));
        assert!(header(&headers, "access-control-allow-origin").is_none());
    }

    #[test]
    fn test_non_api_paths_get_no_cors() {
        let facts = RequestFacts::new("/about").with_origin("http://localhost:3000");
        let headers = forwarded(router().decide(&facts));
        assert!(header(&headers, "access-control-allow-methods").is_none());
        assert_eq!(headers.len(), 4);
    }

    #[test]
    fn test_facts_from_request() {
        let req = Request::builder()
            .uri("http://hub.local/dashboard?tab=1")
            .header("cookie", "theme=dark; session=\"abc\"")
            .header("origin", "http://localhost:3000")
            .body(Body::empty())
            .unwrap();

        let facts = RequestFacts::from_request(&req);
        assert_eq!(facts.path, "/dashboard");
        assert_eq!(facts.cookies.get("session").map(String::as_str), Some("abc"));
        assert_eq!(facts.origin.as_deref(), Some("http://localhost:3000"));
        assert_eq!(router().decide_request(&req).outcome(), "forward");
    }

    #[test]
    fn test_cookie_header_parsing_skips_garbage() {
        let pairs: Vec<_> = parse_cookie_header("a=1; ; =x; novalue; b = 2 ").collect();
        assert_eq!(
            pairs,
            vec![("a".to_string(), "1".to_string()), ("b".to_string(), "2".to_string())]
        );
    }
}
