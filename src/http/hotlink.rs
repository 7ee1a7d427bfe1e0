//! Hotlink protection module
//!
//! Images may only be embedded by pages on the serving host itself or on a
//! whitelisted host. Requests without a referer are never policed.

use std::collections::HashSet;
use url::Url;

use super::mime;

/// Decide whether a request may receive the file it asked for
///
/// # Arguments
/// * `referer` - Value of the `Referer` header, if any
/// * `request_host` - Host the client addressed, port allowed
/// * `content_type` - Resolved MIME type of the requested file
/// * `whitelist` - Lowercased hostnames allowed to embed images
///
/// A referer that does not parse as an absolute URL counts as foreign.
pub fn is_allowed(
    referer: Option<&str>,
    request_host: Option<&str>,
    content_type: &str,
    whitelist: &HashSet<String>,
) -> bool {
    let Some(referer) = referer else {
        return true;
    };
    if !mime::is_image(content_type) {
        return true;
    }

    let Some(referer_host) = referer_host(referer) else {
        return false;
    };

    let same_host = request_host
        .map(strip_port)
        .is_some_and(|host| host.eq_ignore_ascii_case(&referer_host));

    same_host || whitelist.contains(&referer_host)
}

/// Lowercased host of a referer URL
fn referer_host(referer: &str) -> Option<String> {
    let url = Url::parse(referer.trim()).ok()?;
    url.host_str().map(str::to_ascii_lowercase)
}

/// Drop the port from a `Host` header value, keeping IPv6 brackets
pub fn strip_port(host: &str) -> &str {
    let host = host.trim();
    if host.starts_with('[') {
        return host.find(']').map_or(host, |end| &host[..=end]);
    }
    host.rsplit_once(':').map_or(host, |(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whitelist(hosts: &[&str]) -> HashSet<String> {
        hosts.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_no_referer_always_allowed() {
        assert!(is_allowed(None, Some("localhost"), "image/png", &whitelist(&[])));
    }

    #[test]
    fn test_non_image_never_policed() {
        assert!(is_allowed(
            Some("http://evil.example/page"),
            Some("localhost:8080"),
            "text/html; charset=utf-8",
            &whitelist(&[])
        ));
    }

    #[test]
    fn test_foreign_referer_denied() {
        assert!(!is_allowed(
            Some("http://evil.example/page"),
            Some("localhost:8080"),
            "image/jpeg",
            &whitelist(&[])
        ));
    }

    #[test]
    fn test_same_host_allowed() {
        assert!(is_allowed(
            Some("http://Localhost:8080/gallery.html"),
            Some("localhost:8080"),
            "image/jpeg",
            &whitelist(&[])
        ));
    }

    #[test]
    fn test_whitelisted_host_allowed() {
        assert!(is_allowed(
            Some("https://cdn.example.com/a"),
            Some("localhost"),
            "image/gif",
            &whitelist(&["cdn.example.com"])
        ));
    }

    #[test]
    fn test_unparseable_referer_denied() {
        assert!(!is_allowed(
            Some("not a url"),
            Some("localhost"),
            "image/png",
            &whitelist(&[])
        ));
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("localhost:8080"), "localhost");
        assert_eq!(strip_port("example.com"), "example.com");
        assert_eq!(strip_port("[::1]:8080"), "[::1]");
        assert_eq!(strip_port("[::1]"), "[::1]");
    }
}
