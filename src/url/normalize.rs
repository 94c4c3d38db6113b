use crate::UrlError;
use url::Url;

/// Produces the canonical form of a page URL
///
/// Two links name the same graph node iff their canonical strings are equal.
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an HTTP(S) scheme and a host
/// 3. Lowercase the host
/// 4. Remove the fragment (everything after #)
/// 5. Remove an empty query string (trailing ?)
///
/// Dot segments and percent-encoding are already normalized by the `url`
/// parser. Paths are otherwise left alone: article titles are case- and
/// slash-sensitive.
///
/// # Examples
///
/// ```
/// use wikipaths::url::normalize_url;
///
/// let url = normalize_url("https://EN.wikipedia.org/wiki/Rust#History").unwrap();
/// assert_eq!(url.as_str(), "https://en.wikipedia.org/wiki/Rust");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Normalizes an already parsed URL (see [`normalize_url`])
pub fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let host = url
        .host_str()
        .map(str::to_lowercase)
        .ok_or(UrlError::MissingDomain)?;
    if url.host_str() != Some(host.as_str()) {
        url.set_host(Some(&host))
            .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;
    }

    url.set_fragment(None);

    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}
