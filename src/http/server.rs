//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with export handlers and the proxy fallback
//! - Wire up middleware (edge router, timeout, request ID, tracing)
//! - Bind server to listener
//! - Forward requests to the upstream origin

use std::str::FromStr;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::uri::{Authority, PathAndQuery, Scheme},
    http::{Request, StatusCode, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::HubConfig;
use crate::http::export::{export_expenses, export_records};
use crate::http::middleware::{edge_router_middleware, EdgeState};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::lifecycle::shutdown::shutdown_signal;
use crate::observability::metrics;
use crate::routing::EdgeRouter;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Option<Authority>,
    pub client: Client<HttpConnector, Body>,
}

/// HTTP server for the hub edge.
pub struct HttpServer {
    router: Router,
    config: HubConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: HubConfig) -> Self {
        let edge = EdgeState::new(EdgeRouter::from_config(&config));

        let upstream = config.upstream.address.as_deref().and_then(|addr| {
            match Authority::from_str(addr) {
                Ok(authority) => Some(authority),
                Err(e) => {
                    tracing::error!(upstream = %addr, error = %e, "Invalid upstream address, forwarding disabled");
                    None
                }
            }
        });

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.upstream.connect_timeout_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        let state = AppState { upstream, client };
        let router = Self::build_router(&config, state, edge);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &HubConfig, state: AppState, edge: EdgeState) -> Router {
        Router::new()
            .route("/api/export/expenses", post(export_expenses))
            .route("/api/export/records", post(export_records))
            .fallback(proxy_handler)
            .with_state(state)
            .layer(middleware::from_fn_with_state(edge, edge_router_middleware))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer())
                    .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs))),
            )
    }

    /// The fully layered router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires or Ctrl+C is received.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            environment = %self.config.environment,
            upstream = ?self.config.upstream.address,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &HubConfig {
        &self.config
    }
}

/// Fallback handler: forwards the request to the upstream origin unchanged.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request.request_id().to_string();

    let Some(authority) = state.upstream.clone() else {
        tracing::debug!(request_id = %request_id, path = %request.uri().path(), "No upstream configured");
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    let (mut parts, body) = request.into_parts();

    // URI rewrite
    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = Some(authority);
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Could not build upstream URI");
            return (StatusCode::BAD_REQUEST, "Invalid request URI").into_response();
        }
    };

    let path = parts.uri.path().to_string();
    tracing::debug!(request_id = %request_id, path = %path, "Forwarding request");

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            metrics::record_upstream(response.status().as_u16());
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, path = %path, error = %e, "Upstream error");
            metrics::record_upstream(StatusCode::BAD_GATEWAY.as_u16());
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
