//! URL handling module for feedharvest
//!
//! This module builds listing and detail request URLs, rewrites URLs through
//! the forwarding proxy, and derives CSV table names from item permalinks.

use crate::config::ProxyConfig;
use crate::{UrlError, UrlResult};
use url::Url;

/// Suffix selecting the JSON rendering of a listing or detail endpoint
const JSON_SUFFIX: &str = ".json";

/// Builds the JSON listing URL for a feed
///
/// The endpoint shape is `{base}/r/{listing}.json?limit={n}`.
///
/// # Arguments
///
/// * `base_url` - Base URL of the content-aggregation API
/// * `listing` - The listing (feed) name
/// * `limit` - Maximum number of items in the response
pub fn listing_url(base_url: &str, listing: &str, limit: u32) -> UrlResult<String> {
    let mut url = Url::parse(base_url).map_err(|e| UrlError::Parse(e.to_string()))?;
    url.set_path(&format!("/r/{}{}", listing, JSON_SUFFIX));
    url.set_query(Some(&format!("limit={}", limit)));
    Ok(url.into())
}

/// Builds the JSON detail URL for an item permalink
///
/// The endpoint shape is `{base}{permalink}.json`; the permalink is used as
/// the path verbatim.
pub fn detail_url(base_url: &str, permalink: &str) -> UrlResult<String> {
    let mut url = Url::parse(base_url).map_err(|e| UrlError::Parse(e.to_string()))?;
    url.set_path(permalink);
    url.set_query(None);
    let mut detail: String = url.into();
    detail.push_str(JSON_SUFFIX);
    Ok(detail)
}

/// Rewrites a URL to route through the forwarding proxy
///
/// Produces `{proxy_base}?api_key={key}&url={encoded}&country={country}`,
/// matching the proxy service's relay contract. Query-pair encoding is
/// handled by the `url` crate.
pub fn proxy_url(proxy: &ProxyConfig, target: &str) -> UrlResult<String> {
    let mut url = Url::parse(&proxy.base_url).map_err(|e| UrlError::Parse(e.to_string()))?;
    url.query_pairs_mut()
        .append_pair("api_key", &proxy.api_key)
        .append_pair("url", target)
        .append_pair("country", &proxy.country);
    Ok(url.into())
}

/// Derives a comment table name from an item permalink
///
/// Takes the path segment before the trailing slash (permalinks end with
/// `/`, so this is the human-readable slug) and replaces a single embedded
/// space with a hyphen.
///
/// # Example
///
/// ```
/// use feedharvest::url::derive_table_name;
///
/// let name = derive_table_name("/r/news/comments/xyz/some-title/").unwrap();
/// assert_eq!(name, "some-title");
/// ```
pub fn derive_table_name(permalink: &str) -> UrlResult<String> {
    let parts: Vec<&str> = permalink.split('/').collect();
    if parts.len() < 2 {
        return Err(UrlError::MalformedPermalink(permalink.to_string()));
    }

    let segment = parts[parts.len() - 2];
    if segment.is_empty() {
        return Err(UrlError::MalformedPermalink(permalink.to_string()));
    }

    Ok(segment.replacen(' ', "-", 1))
}
