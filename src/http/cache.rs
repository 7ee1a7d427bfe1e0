//! HTTP cache control module
//!
//! Content-hash `ETag` generation, conditional request evaluation and the
//! strong-cache headers attached to fresh responses.

use chrono::{DateTime, TimeDelta, Utc};
use sha2::{Digest, Sha256};
use std::time::SystemTime;

/// IMF-fixdate, the preferred HTTP date format (RFC 9110 §5.6.7)
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Outcome of evaluating a request's validators against the current file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheDecision {
    /// Client copy is current: answer 304 without a body
    NotModified,
    /// Body must be sent along with these headers
    Fresh(CacheHeaders),
}

/// Headers attached to a fresh response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheHeaders {
    pub etag: String,
    pub last_modified: String,
    pub max_age: u32,
    pub expires: String,
}

impl CacheHeaders {
    pub fn new(etag: String, last_modified: String, max_age: u32, now: DateTime<Utc>) -> Self {
        let expires = format_http_date(now + TimeDelta::seconds(i64::from(max_age)));
        Self {
            etag,
            last_modified,
            max_age,
            expires,
        }
    }

    /// Value of the `Cache-Control` header
    pub fn cache_control(&self) -> String {
        format!("max-age={}", self.max_age)
    }
}

/// Generate a strong `ETag` from the full content
///
/// The tag is the first 128 bits of the SHA-256 digest, hex-encoded and
/// quoted, e.g. `"9f86d081884c7d659a2feaa0c55ad015"`. It depends on the bytes
/// only, never on file name or timestamps.
pub fn generate_etag(content: &[u8]) -> String {
    let digest = Sha256::digest(content);
    format!("\"{}\"", hex::encode(&digest[..16]))
}

/// Check if client's `If-None-Match` header matches the server's `ETag`
///
/// Supports a single tag, a comma-separated list and the `*` wildcard.
/// Comparison is weak (RFC 9110 §8.8.3.2): a `W/` prefix on either side is
/// ignored.
pub fn check_etag_match(if_none_match: Option<&str>, etag: &str) -> bool {
    let etag = strip_weak(etag);
    if_none_match.is_some_and(|client_etag| {
        client_etag
            .split(',')
            .map(|e| strip_weak(e.trim()))
            .any(|e| e == etag || e == "*")
    })
}

fn strip_weak(tag: &str) -> &str {
    tag.strip_prefix("W/").unwrap_or(tag)
}

/// Format a timestamp as an HTTP date
pub fn format_http_date(time: DateTime<Utc>) -> String {
    time.format(HTTP_DATE_FORMAT).to_string()
}

/// Decide between a 304 and a fresh response
///
/// `content` is the full file body, read once by the caller and reused for
/// the response. `If-None-Match` is evaluated first; `If-Modified-Since` must
/// equal the formatted modification time exactly.
pub fn negotiate(
    if_none_match: Option<&str>,
    if_modified_since: Option<&str>,
    content: &[u8],
    modified: SystemTime,
    max_age: u32,
) -> CacheDecision {
    let etag = generate_etag(content);
    let last_modified = format_http_date(DateTime::<Utc>::from(modified));

    if check_etag_match(if_none_match, &etag)
        || if_modified_since.is_some_and(|since| since.trim() == last_modified)
    {
        return CacheDecision::NotModified;
    }

    CacheDecision::Fresh(CacheHeaders::new(etag, last_modified, max_age, Utc::now()))
}
