//! Single-page-application fallback.
//!
//! # Responsibilities
//! - Hold the set of client-side-routed paths (case-insensitive)
//! - Serve the application's root document for requests on those paths,
//!   instead of proxying them
//!
//! # Design Decisions
//! - The static-file stage is reachable only through the rewrite branch;
//!   asset serving for everything else belongs to the embedding
//!   application, not to this proxy
//! - The request is re-pointed at the root document and handed to the
//!   static-file service, so missing-document behavior is the file
//!   service's own (404)

use std::collections::HashSet;
use std::path::Path;

use axum::{
    body::Body,
    http::{Request, Uri},
    response::{IntoResponse, Response},
};
use tower::util::ServiceExt;
use tower_http::services::ServeDir;

use crate::config::ConfigError;

/// Client-side routes plus the static service for the root document.
///
/// Built once at startup; shared read-only across requests.
#[derive(Clone, Debug)]
pub struct SpaFallback {
    paths: HashSet<String>,
    index_uri: Uri,
    files: ServeDir,
}

impl SpaFallback {
    /// `index` is the root document path within `static_root`, e.g.
    /// "/index.html". Paths are matched case-insensitively.
    pub fn new<P: AsRef<Path>>(
        paths: Vec<String>,
        static_root: P,
        index: &str,
    ) -> Result<Self, ConfigError> {
        let index_uri = Uri::try_from(index)
            .map_err(|_| ConfigError::Spa(format!("invalid index path {index:?}")))?;

        Ok(Self {
            paths: paths.into_iter().map(|p| p.to_ascii_lowercase()).collect(),
            index_uri,
            files: ServeDir::new(static_root),
        })
    }

    /// Case-insensitive membership test against the configured routes.
    pub fn matches(&self, path: &str) -> bool {
        self.paths.contains(&path.to_ascii_lowercase())
    }

    /// Path of the root document, as configured.
    pub fn index_path(&self) -> &str {
        self.index_uri.path()
    }

    /// Serve the root document in place of the original request.
    pub async fn serve_root(&self, req: Request<Body>) -> Response {
        let (mut parts, body) = req.into_parts();
        parts.uri = self.index_uri.clone();
        let req = Request::from_parts(parts, body);

        match self.files.clone().oneshot(req).await {
            Ok(response) => response.map(Body::new).into_response(),
            Err(infallible) => match infallible {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_is_case_insensitive() {
        let spa = SpaFallback::new(
            vec!["/app/dashboard".to_string(), "/App/Settings".to_string()],
            "wwwroot",
            "/index.html",
        )
        .unwrap();

        assert!(spa.matches("/app/dashboard"));
        assert!(spa.matches("/APP/DASHBOARD"));
        assert!(spa.matches("/app/settings"));
        assert!(!spa.matches("/app/orders"));
    }

    #[test]
    fn test_index_path_round_trips() {
        let spa = SpaFallback::new(Vec::new(), "wwwroot", "/index.html").unwrap();
        assert_eq!(spa.index_path(), "/index.html");
    }

    #[test]
    fn test_unparseable_index_is_rejected() {
        let err = SpaFallback::new(Vec::new(), "wwwroot", "http://[bad").unwrap_err();
        assert!(matches!(err, ConfigError::Spa(_)));
    }
}
