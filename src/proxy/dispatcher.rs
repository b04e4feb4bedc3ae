//! Per-request routing decision and upstream forwarding.
//!
//! # Responsibilities
//! - Decide the outcome for one request: bypass, SPA fallback, or forward
//! - Forward requests to the backend over the pooled client with a bounded
//!   timeout and no redirect following
//! - Map upstream failures to gateway status codes
//!
//! # Design Decisions
//! - `decide` is pure; the handler executes the decision it returns
//! - A single dispatcher serves both the plain and the SPA-aware entry
//!   points: when no SPA set is configured the branch is never taken
//! - Dropping the in-flight upstream future on timeout or client
//!   disconnect cancels the backend call

use std::time::Duration;

use axum::{
    body::Body,
    http::{
        uri::{Authority, PathAndQuery, Scheme},
        Request, StatusCode, Uri,
    },
    response::{IntoResponse, Response},
};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use url::Url;

use crate::config::ConfigError;
use crate::proxy::exclusions::ExclusionSet;
use crate::proxy::redirect::RedirectRewriter;
use crate::spa::SpaFallback;

/// Outcome chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Path is owned by a co-located API; answer 404 locally.
    Bypass,
    /// Client-side route; serve the root document instead of proxying.
    SpaFallback,
    /// Forward to the backend.
    Forward,
}

impl DispatchOutcome {
    /// Label used for metrics and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchOutcome::Bypass => "bypass",
            DispatchOutcome::SpaFallback => "spa_fallback",
            DispatchOutcome::Forward => "forward",
        }
    }
}

/// Per-request decision record.
///
/// Created when a request arrives, discarded when it completes; never
/// shared across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Path as received from the client.
    pub path: String,
    pub outcome: DispatchOutcome,
    /// Path the request was rewritten to, for the SPA fallback outcome.
    pub rewritten: Option<String>,
}

/// Decide what to do with a request. First match wins: bypass, SPA, forward.
pub fn decide(path: &str, exclusions: &ExclusionSet, spa: Option<&SpaFallback>) -> Decision {
    if exclusions.contains(path) {
        return Decision {
            path: path.to_string(),
            outcome: DispatchOutcome::Bypass,
            rewritten: None,
        };
    }

    if let Some(spa) = spa {
        if spa.matches(path) {
            return Decision {
                path: path.to_string(),
                outcome: DispatchOutcome::SpaFallback,
                rewritten: Some(spa.index_path().to_string()),
            };
        }
    }

    Decision {
        path: path.to_string(),
        outcome: DispatchOutcome::Forward,
        rewritten: None,
    }
}

/// Forwards requests to the backend and rewrites redirect responses.
///
/// The client pool, backend address and rewriter are fixed at startup and
/// shared read-only by all in-flight requests.
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    scheme: Scheme,
    authority: Authority,
    rewriter: RedirectRewriter,
    timeout: Duration,
}

impl Forwarder {
    pub fn new(
        backend: &Url,
        destination: Url,
        client: Client<HttpConnector, Body>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let scheme = Scheme::try_from(backend.scheme())
            .map_err(|_| ConfigError::Upstream(format!("unsupported scheme in {backend}")))?;

        let host = backend
            .host_str()
            .ok_or_else(|| ConfigError::Upstream(format!("no host in {backend}")))?;
        let authority = match backend.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        let authority = Authority::try_from(authority.as_str())
            .map_err(|_| ConfigError::Upstream(format!("invalid authority in {backend}")))?;

        Ok(Self {
            client,
            scheme,
            authority,
            rewriter: RedirectRewriter::new(destination),
            timeout,
        })
    }

    /// Forward one request: same method, headers and body, with the URI
    /// re-pointed at the backend. The response is returned as-is apart from
    /// redirect rewriting; the body streams through without buffering.
    pub async fn forward(&self, mut req: Request<Body>) -> Response {
        let mut parts = req.uri().clone().into_parts();
        parts.scheme = Some(self.scheme.clone());
        parts.authority = Some(self.authority.clone());
        if parts.path_and_query.is_none() {
            parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }

        let uri = match Uri::from_parts(parts) {
            Ok(uri) => uri,
            Err(error) => {
                tracing::error!(error = %error, "Failed to re-point request at the backend");
                return (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response();
            }
        };
        *req.uri_mut() = uri;

        match tokio::time::timeout(self.timeout, self.client.request(req)).await {
            Ok(Ok(response)) => {
                let (mut parts, body) = response.into_parts();
                self.rewriter.apply(&mut parts.headers);
                Response::from_parts(parts, Body::new(body)).into_response()
            }
            Ok(Err(error)) => {
                tracing::error!(error = %error, "Upstream request failed");
                (StatusCode::BAD_GATEWAY, "Upstream request failed").into_response()
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "Upstream request timed out"
                );
                (StatusCode::GATEWAY_TIMEOUT, "Upstream request timed out").into_response()
            }
        }
    }
}
