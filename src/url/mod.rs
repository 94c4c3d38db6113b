//! URL handling module for Wikipaths
//!
//! This module turns raw links into canonical graph node identities and
//! decides whether a link belongs to the scoping host.

mod domain;
mod normalize;

use crate::UrlError;
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, is_in_scope};
pub use normalize::{normalize_parsed, normalize_url};

/// Resolves a link found on `base` into a canonical, in-scope node URL
///
/// The link is joined against the page it was found on, normalized, and then
/// admitted only if its host is the scoping host and it carries no query
/// string. Everything else is rejected so the crawl core never has to
/// re-validate link identity.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use wikipaths::url::resolve_scoped;
///
/// let base = Url::parse("https://en.wikipedia.org/wiki/Knowledge").unwrap();
/// let link = resolve_scoped("/wiki/Philosophy#Etymology", &base, "en.wikipedia.org").unwrap();
/// assert_eq!(link.as_str(), "https://en.wikipedia.org/wiki/Philosophy");
///
/// assert!(resolve_scoped("/w/index.php?title=X", &base, "en.wikipedia.org").is_err());
/// assert!(resolve_scoped("https://example.com/", &base, "en.wikipedia.org").is_err());
/// ```
pub fn resolve_scoped(href: &str, base: &Url, scoping_host: &str) -> Result<Url, UrlError> {
    let joined = base
        .join(href.trim())
        .map_err(|e| UrlError::Parse(e.to_string()))?;
    let url = normalize_parsed(joined)?;
    ensure_scoped(&url, scoping_host)?;
    Ok(url)
}

/// Checks that an already canonical URL is a valid graph node
pub fn ensure_scoped(url: &Url, scoping_host: &str) -> Result<(), UrlError> {
    if !is_in_scope(url, scoping_host) {
        return Err(UrlError::OutOfScope {
            url: url.to_string(),
            host: scoping_host.to_string(),
        });
    }

    if url.query().is_some() {
        return Err(UrlError::HasQuery(url.to_string()));
    }

    Ok(())
}
