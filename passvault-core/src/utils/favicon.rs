//! Website url / favicon derivation helpers.

use url::Url;

const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";

/// Resolve the url stored on an item.
///
/// A blank url falls back to the website name: used as-is when it already
/// looks like an http(s) url, otherwise prefixed with `https://`.
#[must_use]
pub fn resolve_url(website: &str, url: Option<&str>) -> String {
    match url.map(str::trim) {
        Some(u) if !u.is_empty() => u.to_string(),
        _ => {
            let website = website.trim();
            if website.starts_with("http") {
                website.to_string()
            } else {
                format!("https://{website}")
            }
        }
    }
}

/// Derive the favicon reference for a url. `None` when no host can be parsed.
#[must_use]
pub fn favicon_url(website_url: &str) -> Option<String> {
    let candidate = if website_url.starts_with("http") {
        website_url.to_string()
    } else {
        format!("https://{website_url}")
    };

    match Url::parse(&candidate) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| format!("{FAVICON_SERVICE}?domain={host}&sz=128")),
        Err(e) => {
            log::debug!("Cannot derive favicon from {website_url}: {e}");
            None
        }
    }
}
