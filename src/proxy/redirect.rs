//! Redirect rewriting.
//!
//! # Responsibilities
//! - Rewrite absolute `Location` headers on backend responses so the
//!   backend's internal address never reaches the client
//! - Leave relative and unparseable values untouched
//!
//! # Design Decisions
//! - Any absolute Location is rewritten to the public destination's
//!   scheme and authority; only backend-originated responses pass through
//!   this hook, so no authority comparison is needed
//! - Fail-open: a value that cannot be parsed or rebuilt passes through
//!   unmodified rather than being dropped or corrupted
//! - Path, query and fragment are preserved exactly

use axum::http::{header, HeaderMap, HeaderValue};
use url::Url;

/// Rewrites redirect targets to the public-facing destination.
///
/// Stateless given the destination; shared read-only across requests.
#[derive(Debug, Clone)]
pub struct RedirectRewriter {
    destination: Url,
}

impl RedirectRewriter {
    pub fn new(destination: Url) -> Self {
        Self { destination }
    }

    /// Rewrite a single header value.
    ///
    /// Returns `None` when the value should pass through unchanged: it is
    /// relative, it does not parse, or it cannot carry the destination's
    /// scheme and authority.
    pub fn rewrite(&self, raw: &str) -> Option<String> {
        let mut url = Url::parse(raw).ok()?;
        if !url.has_host() {
            return None;
        }

        url.set_scheme(self.destination.scheme()).ok()?;
        url.set_host(self.destination.host_str()).ok()?;
        url.set_port(self.destination.port()).ok()?;

        Some(url.into())
    }

    /// Apply the rewrite to a response header map in place.
    pub fn apply(&self, headers: &mut HeaderMap) {
        let Some(value) = headers.get(header::LOCATION) else {
            return;
        };
        let Ok(raw) = value.to_str() else {
            return;
        };

        if let Some(rewritten) = self.rewrite(raw) {
            if let Ok(value) = HeaderValue::from_str(&rewritten) {
                tracing::debug!(location = %rewritten, "Rewrote redirect target");
                headers.insert(header::LOCATION, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewriter(destination: &str) -> RedirectRewriter {
        RedirectRewriter::new(Url::parse(destination).unwrap())
    }

    #[test]
    fn test_absolute_location_is_rewritten() {
        let rewriter = rewriter("https://public.example.com");
        assert_eq!(
            rewriter.rewrite("https://internal-backend:9000/order/42"),
            Some("https://public.example.com/order/42".to_string())
        );
    }

    #[test]
    fn test_scheme_follows_destination() {
        let rewriter = rewriter("https://public.example.com");
        assert_eq!(
            rewriter.rewrite("http://internal-backend:9000/login"),
            Some("https://public.example.com/login".to_string())
        );
    }

    #[test]
    fn test_relative_location_is_untouched() {
        let rewriter = rewriter("https://public.example.com");
        assert_eq!(rewriter.rewrite("/order/42"), None);
    }

    #[test]
    fn test_unparseable_location_is_untouched() {
        let rewriter = rewriter("https://public.example.com");
        assert_eq!(rewriter.rewrite("http://[not-a-host"), None);
    }

    #[test]
    fn test_query_and_fragment_are_preserved() {
        let rewriter = rewriter("https://public.example.com");
        assert_eq!(
            rewriter.rewrite("http://internal:8080/orders?page=2&sort=desc#row-9"),
            Some("https://public.example.com/orders?page=2&sort=desc#row-9".to_string())
        );
    }

    #[test]
    fn test_destination_port_is_carried_over() {
        let rewriter_with_port = rewriter("https://public.example.com:8443");
        assert_eq!(
            rewriter_with_port.rewrite("http://internal:9000/a"),
            Some("https://public.example.com:8443/a".to_string())
        );

        // And a default-port destination strips the backend's explicit port.
        let rewriter_default_port = rewriter("https://public.example.com");
        assert_eq!(
            rewriter_default_port.rewrite("http://internal:9000/a"),
            Some("https://public.example.com/a".to_string())
        );
    }

    #[test]
    fn test_round_trip_resolves_to_same_resource() {
        let destination = Url::parse("https://public.example.com").unwrap();
        let backend = Url::parse("http://internal-backend:9000").unwrap();
        let rewriter = RedirectRewriter::new(destination.clone());

        let original = "http://internal-backend:9000/order/42?tab=history";
        let rewritten = rewriter.rewrite(original).unwrap();

        let against_backend = backend.join(original).unwrap();
        let against_destination = destination.join(&rewritten).unwrap();
        assert_eq!(against_backend.path(), against_destination.path());
        assert_eq!(against_backend.query(), against_destination.query());
    }

    #[test]
    fn test_apply_only_touches_location() {
        let rewriter = rewriter("https://public.example.com");
        let mut headers = HeaderMap::new();
        headers.insert(header::LOCATION, "http://internal:9000/next".parse().unwrap());
        headers.insert("x-backend-node", "internal:9000".parse().unwrap());

        rewriter.apply(&mut headers);

        assert_eq!(
            headers.get(header::LOCATION).unwrap(),
            "https://public.example.com/next"
        );
        assert_eq!(headers.get("x-backend-node").unwrap(), "internal:9000");
    }

    #[test]
    fn test_apply_leaves_relative_location_alone() {
        let rewriter = rewriter("https://public.example.com");
        let mut headers = HeaderMap::new();
        headers.insert(header::LOCATION, "/order/42".parse().unwrap());

        rewriter.apply(&mut headers);

        assert_eq!(headers.get(header::LOCATION).unwrap(), "/order/42");
    }
}
