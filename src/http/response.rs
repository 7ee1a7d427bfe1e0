//! HTTP response building module
//!
//! Builders for every response the server emits. None of them fail: a builder
//! error is logged and replaced by a bare response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::cache::CacheHeaders;
use super::compression::Encoding;

pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Fixed body of every 500 response
pub const SERVER_ERROR_BODY: &str = "there is something wrong in the server! please try later!";

/// Content type of the hotlink placeholder image
pub const PLACEHOLDER_CONTENT_TYPE: &str = "image/jpeg";

/// Build 304 Not Modified response
///
/// Status line only: no body and no content headers.
pub fn build_304_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build the generic 500 response
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_BODY)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    let mut response = build_text_response(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
    response
        .headers_mut()
        .insert("Allow", hyper::header::HeaderValue::from_static(ALLOWED_METHODS));
    response
}

/// Build OPTIONS response
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", ALLOWED_METHODS)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build a status response with a plain-text body
fn build_text_response(status: StatusCode, text: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from_static(text.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::from_static(text.as_bytes())))
        })
}

/// Build a 200 response around an in-memory document (listing pages)
pub fn build_document_response(
    content: Vec<u8>,
    content_type: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build the fresh 200 response for a file
///
/// `data` is already encoded with `encoding`; `Content-Length` describes the
/// encoded body.
pub fn build_file_response(
    data: Vec<u8>,
    content_type: &str,
    encoding: Encoding,
    cache: &CacheHeaders,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data)
    };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", cache.etag.as_str())
        .header("Last-Modified", cache.last_modified.as_str())
        .header("Cache-Control", cache.cache_control())
        .header("Expires", cache.expires.as_str());

    if let Some(coding) = encoding.header_value() {
        builder = builder.header("Content-Encoding", coding);
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build the response substituted for a hotlinked image
pub fn build_placeholder_response(data: Vec<u8>, is_head: bool) -> Response<Full<Bytes>> {
    build_document_response(data, PLACEHOLDER_CONTENT_TYPE, is_head)
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}
