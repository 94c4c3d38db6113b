//! HTML parser for extracting same-site links
//!
//! Only `<a href>` targets are graph edges. Each target is resolved against
//! the page URL and passed through [`resolve_scoped`], so the returned links
//! are canonical, on the scoping host, and free of query strings.

use crate::url::resolve_scoped;
use scraper::{Html, Selector};
use url::Url;

/// Extracts all in-scope links from an HTML document
///
/// # Exclusions
///
/// - links to other hosts
/// - links carrying a query string
/// - `javascript:`, `mailto:`, `tel:` and other non-HTTP schemes
/// - fragment-only links (they point back at the page itself)
/// - `<a download>` links
///
/// Links are returned in document order; repeats are kept since the
/// coordinator deduplicates.
///
/// # Example
///
/// ```
/// use url::Url;
/// use wikipaths::crawler::extract_links;
///
/// let html = r#"<a href="/wiki/Philosophy">P</a><a href="https://example.com/">X</a>"#;
/// let base = Url::parse("https://en.wikipedia.org/wiki/Knowledge").unwrap();
/// let links = extract_links(html, &base, "en.wikipedia.org");
/// assert_eq!(links, vec!["https://en.wikipedia.org/wiki/Philosophy"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url, scoping_host: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut links = Vec::new();
    for element in document.select(&a_selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') {
            continue;
        }

        match resolve_scoped(href, base_url, scoping_host) {
            Ok(url) => links.push(url.to_string()),
            Err(e) => tracing::trace!("Skipping link {}: {}", href, e),
        }
    }

    links
}
