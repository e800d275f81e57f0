//! HTTP server setup and upstream forwarding.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, request ID, timeout, trap)
//! - Forward exempt and allowed requests to the configured upstream
//! - Serve with graceful shutdown
//!
//! # Design Decisions
//! - The trap middleware is the innermost layer: timeout and request ID
//!   apply to trapped and forwarded requests alike
//! - Forwarding rewrites only scheme and authority; path, query, method,
//!   headers, and body pass through untouched
//! - Upstream failures map to 502; they are the pipeline's to report, the
//!   trap never re-enters the picture

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{Request, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::Router;
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::http::middleware::trap_middleware;
use crate::http::request_id::{RequestIdLayer, REQUEST_ID_HEADER};
use crate::lifecycle::Shutdown;
use crate::rules::RuleSet;

/// Application state injected into handlers and the trap middleware.
#[derive(Clone)]
pub struct AppState {
    /// Frozen trap rules, shared lock-free across requests.
    pub rules: Arc<RuleSet>,
    /// Upstream HTTP client.
    pub client: Client<HttpConnector, Body>,
    /// Address of the next pipeline stage (host:port).
    pub upstream: String,
}

impl AppState {
    /// Build state for a rule set and upstream address.
    pub fn for_rules(rules: Arc<RuleSet>, upstream: &str) -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self {
            rules,
            client,
            upstream: upstream.to_string(),
        }
    }
}

/// HTTP server for the trap proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server from the loaded configuration and the
    /// frozen rule set.
    pub fn new(config: &ServerConfig, rules: RuleSet) -> Self {
        let state = AppState::for_rules(Arc::new(rules), &config.upstream.address);
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(forward_handler))
            .route("/", any(forward_handler))
            .with_state(state.clone())
            .layer(axum::middleware::from_fn_with_state(state, trap_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server on the given listener until shutdown is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Final pipeline stage: hand the request to the upstream.
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let (mut parts, body) = request.into_parts();

    let mut uri_parts = parts.uri.clone().into_parts();
    uri_parts.scheme = Some(Scheme::HTTP);
    uri_parts.authority = match Authority::from_str(&state.upstream) {
        Ok(authority) => Some(authority),
        Err(error) => {
            tracing::error!(request_id = %request_id, upstream = %state.upstream, %error, "invalid upstream address");
            return (StatusCode::BAD_GATEWAY, "Invalid upstream address").into_response();
        }
    };
    if uri_parts.path_and_query.is_none() {
        uri_parts.path_and_query = Some(PathAndQuery::from_static("/"));
    }
    parts.uri = match Uri::from_parts(uri_parts) {
        Ok(uri) => uri,
        Err(error) => {
            tracing::error!(request_id = %request_id, %error, "failed to build upstream URI");
            return (StatusCode::BAD_GATEWAY, "Invalid upstream URI").into_response();
        }
    };

    tracing::debug!(request_id = %request_id, uri = %parts.uri, "forwarding upstream");

    match state.client.request(Request::from_parts(parts, body)).await {
        Ok(response) => {
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body)).into_response()
        }
        Err(error) => {
            tracing::error!(request_id = %request_id, %error, "upstream request failed");
            (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
        }
    }
}
