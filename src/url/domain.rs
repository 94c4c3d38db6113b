use url::Url;

/// Lowercased host of a URL, used as the scoping host for a site
///
/// ```
/// use url::Url;
/// use wikipaths::url::extract_domain;
///
/// let url = Url::parse("https://EN.wikipedia.org/wiki/Knowledge").unwrap();
/// assert_eq!(extract_domain(&url), Some("en.wikipedia.org".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if the URL's host equals the scoping host
///
/// The comparison ignores ASCII case and the port.
pub fn is_in_scope(url: &Url, scoping_host: &str) -> bool {
    url.host_str()
        .is_some_and(|host| host.eq_ignore_ascii_case(scoping_host))
}
