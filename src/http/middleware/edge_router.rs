//! Edge Router Middleware.
//! Applies the router decision to every non-asset request.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::http::request::RequestIdExt;
use crate::observability::metrics;
use crate::routing::{is_bypassed, Decision, EdgeRouter};
use crate::security::content_security_policy;

/// State required by the edge middleware.
#[derive(Clone)]
pub struct EdgeState {
    pub router: Arc<EdgeRouter>,
    /// Content-Security-Policy set on forwarded responses that lack one.
    pub csp: Option<HeaderValue>,
}

impl EdgeState {
    pub fn new(router: EdgeRouter) -> Self {
        let csp = HeaderValue::from_str(&content_security_policy(router.settings().environment)).ok();
        Self {
            router: Arc::new(router),
            csp,
        }
    }
}

pub async fn edge_router_middleware(
    State(state): State<EdgeState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // 1. Static assets are never routed.
    if is_bypassed(request.uri().path()) {
        return next.run(request).await;
    }

    // 2. Decide
    let decision = state.router.decide_request(&request);
    metrics::record_decision(decision.outcome());
    tracing::debug!(
        request_id = %request.request_id(),
        path = %request.uri().path(),
        outcome = decision.outcome(),
        "Edge decision"
    );

    // 3. Redirect, or forward and annotate the response
    match decision {
        Decision::Redirect { location, .. } => Redirect::temporary(&location).into_response(),
        Decision::Forward { headers } => {
            let mut response = next.run(request).await;
            let response_headers = response.headers_mut();
            for (name, value) in headers {
                response_headers.insert(name, value);
            }
            if let Some(csp) = &state.csp {
                response_headers
                    .entry(header::CONTENT_SECURITY_POLICY)
                    .or_insert_with(|| csp.clone());
            }
            response
        }
    }
}
