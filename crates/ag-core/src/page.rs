//! Matching the visitor's page against schedule URLs.

use url::Url;

/// Whether two URLs address the same page.
///
/// Host, explicit port, and path must match. Scheme, query, fragment, and a
/// trailing slash are ignored.
pub fn same_page(a: &Url, b: &Url) -> bool {
    a.host_str().map(str::to_ascii_lowercase) == b.host_str().map(str::to_ascii_lowercase)
        && a.port() == b.port()
        && trimmed_path(a) == trimmed_path(b)
}

fn trimmed_path(url: &Url) -> &str {
    let path = url.path();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// `target` with the page's query string reattached.
///
/// A page without a query leaves the target untouched.
pub fn carry_query(target: &Url, page: &Url) -> Url {
    let mut url = target.clone();
    if let Some(query) = page.query() {
        url.set_query(Some(query));
    }
    url
}
