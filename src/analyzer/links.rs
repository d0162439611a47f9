// src/analyzer/links.rs
// =============================================================================
// This module sorts a page's links into internal and external ones.
//
// A link is INTERNAL when:
// - It is root-relative ("/docs"), or
// - It contains the page's origin ("https://example.com") anywhere in it
// Everything else is EXTERNAL.
//
// The "contains anywhere" test is loose: an external link that
// carries our origin in its query string counts as internal, and "mailto:",
// "#section" or "docs/intro" (no leading slash) all count as external.
//
// Rust concepts:
// - Url: Parsing scheme, host and port out of a URL string
// - Structs: Grouping a link's display form with its probe target
// =============================================================================

use url::Url;

/// One internal link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalLink {
    /// The href exactly as it appeared on the page
    pub href: String,
    /// The absolute URL to probe ("origin + href" for root-relative links)
    pub target: String,
}

/// The two link partitions, each in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedLinks {
    pub internal: Vec<InternalLink>,
    pub external: Vec<String>,
}

impl ClassifiedLinks {
    /// Internal hrefs as they appeared on the page
    pub fn internal_hrefs(&self) -> Vec<String> {
        self.internal.iter().map(|link| link.href.clone()).collect()
    }

    /// Absolute URLs to probe for the internal partition
    pub fn internal_targets(&self) -> Vec<String> {
        self.internal.iter().map(|link| link.target.clone()).collect()
    }
}

// Builds the origin string "scheme://host" for a page URL
//
// An explicit non-default port is kept, so a page on
// http://127.0.0.1:8080/ has origin "http://127.0.0.1:8080".
//
// Returns: None if the URL has no host (e.g. "mailto:x@y.z")
pub fn origin_of(page_url: &Url) -> Option<String> {
    let host = page_url.host_str()?;
    let origin = match page_url.port() {
        Some(port) => format!("{}://{}:{}", page_url.scheme(), host, port),
        None => format!("{}://{}", page_url.scheme(), host),
    };
    Some(origin)
}

// Partitions raw links into internal and external
//
// Parameters:
//   raw_links: hrefs in document order (from the document extractor)
//   origin: the page origin from origin_of()
//
// Every link lands in exactly one partition; none are dropped.
//
// Example:
//   origin = "https://a.com"
//   "/x"              -> internal, target "https://a.com/x"
//   "https://a.com/z" -> internal, target unchanged
//   "https://b.com"   -> external
pub fn classify_links(raw_links: &[String], origin: &str) -> ClassifiedLinks {
    let mut classified = ClassifiedLinks::default();

    for link in raw_links {
        if link.starts_with('/') {
            classified.internal.push(InternalLink {
                href: link.clone(),
                target: format!("{}{}", origin, link),
            });
        } else if link.contains(origin) {
            classified.internal.push(InternalLink {
                href: link.clone(),
                target: link.clone(),
            });
        } else {
            classified.external.push(link.clone());
        }
    }

    classified
}
