//! Exclusion set construction.
//!
//! # Responsibilities
//! - Turn configured co-located API addresses into the set of request
//!   paths that must bypass the proxy
//! - Keep only the path component of each address
//! - Skip malformed entries without failing startup
//!
//! # Design Decisions
//! - Matching is case-insensitive; paths are stored lowercased
//! - Pure function of its inputs, built once, immutable afterwards

use std::collections::HashSet;

use url::Url;

/// Paths served by co-located in-process APIs.
///
/// A request whose path is in this set is answered with 404 locally so the
/// proxy never shadows the sibling API, even if the backend would also
/// respond on that path.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    paths: HashSet<String>,
}

impl ExclusionSet {
    /// Build the set from candidate absolute URLs.
    ///
    /// Entries that do not parse as absolute URLs contribute nothing; these
    /// addresses are optional in some deployments and a missing or mangled
    /// one must not prevent startup.
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut paths = HashSet::new();

        for candidate in urls {
            match Url::parse(candidate.as_ref()) {
                Ok(url) => {
                    paths.insert(url.path().to_ascii_lowercase());
                }
                Err(error) => {
                    tracing::warn!(
                        url = candidate.as_ref(),
                        error = %error,
                        "Skipping malformed local API address"
                    );
                }
            }
        }

        Self { paths }
    }

    /// Case-insensitive membership test.
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(&path.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
