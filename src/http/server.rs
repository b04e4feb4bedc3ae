//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Build the Axum router: every method on every path lands in the
//!   dispatch handler
//! - Assemble shared state (exclusion set, SPA fallback, forwarder) from
//!   validated configuration
//! - Serve with graceful shutdown
//!
//! # Design Decisions
//! - One handler for both the plain and SPA-aware deployments; the SPA
//!   branch exists only when configured
//! - A tracing span named "proxy" is opened per forwarded request only;
//!   bypassed and SPA-fallback requests do not produce one
//! - Shared state is immutable after startup, so concurrent requests read
//!   it without locks

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::Instrument;
use url::Url;

use crate::config::{ConfigError, ProxyConfig};
use crate::http::request::RequestIdLayer;
use crate::observability::metrics;
use crate::proxy::{decide, DispatchOutcome, ExclusionSet, Forwarder};
use crate::spa::SpaFallback;

/// Application state injected into the handler.
///
/// Everything here is read-only after startup and shared by all in-flight
/// requests.
#[derive(Clone)]
pub struct AppState {
    pub exclusions: Arc<ExclusionSet>,
    pub spa: Option<Arc<SpaFallback>>,
    pub forwarder: Arc<Forwarder>,
}

/// HTTP server for the migration proxy.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Assemble the server from validated configuration.
    ///
    /// The destination must already have passed validation; failure here
    /// aborts startup.
    pub fn new(config: ProxyConfig) -> Result<Self, ConfigError> {
        let destination = Url::parse(&config.upstream.destination).map_err(|e| {
            ConfigError::Upstream(format!(
                "destination {:?}: {e}",
                config.upstream.destination
            ))
        })?;
        let backend = Url::parse(&config.upstream.backend)
            .map_err(|e| ConfigError::Upstream(format!("backend {:?}: {e}", config.upstream.backend)))?;

        let exclusions = Arc::new(ExclusionSet::from_urls(&config.upstream.local_apis));

        let spa = if config.spa.enabled {
            Some(Arc::new(SpaFallback::new(
                config.spa.paths.clone(),
                &config.spa.static_root,
                &config.spa.index,
            )?))
        } else {
            None
        };

        // Pooled connections across requests; the raw client follows no
        // redirects, performs no decompression and keeps no cookies.
        let client: Client<HttpConnector, Body> =
            Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        let forwarder = Arc::new(Forwarder::new(
            &backend,
            destination,
            client,
            Duration::from_secs(config.timeouts.request_secs),
        )?);

        let state = AppState {
            exclusions,
            spa,
            forwarder,
        };

        Ok(Self {
            router: Self::build_router(state),
        })
    }

    /// Build the Axum router. The dispatcher is the catch-all; an embedding
    /// application would mount its own routes above it.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(dispatch_handler))
            .route("/{*path}", any(dispatch_handler))
            .with_state(state)
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener until
    /// the shutdown signal fires; in-flight requests are drained.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Main dispatch handler: decide the outcome for this request and execute it.
async fn dispatch_handler(State(state): State<AppState>, req: Request) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let decision = decide(&path, &state.exclusions, state.spa.as_deref());

    let response = match decision.outcome {
        DispatchOutcome::Bypass => {
            // Served by a sibling in-process component; never proxied.
            tracing::debug!(path = %path, "Path is served locally; not proxying");
            StatusCode::NOT_FOUND.into_response()
        }
        DispatchOutcome::SpaFallback => match (&state.spa, decision.rewritten.as_deref()) {
            (Some(spa), Some(rewritten)) => {
                tracing::debug!(path = %path, rewritten = %rewritten, "Serving SPA root document");
                spa.serve_root(req).await
            }
            // decide() only yields this outcome when a SPA set is configured.
            _ => StatusCode::NOT_FOUND.into_response(),
        },
        DispatchOutcome::Forward => {
            let span = tracing::info_span!("proxy", path = %path);
            state.forwarder.forward(req).instrument(span).await
        }
    };

    metrics::record_request(
        method.as_str(),
        response.status().as_u16(),
        decision.outcome.as_str(),
        start,
    );

    response
}
