//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation,
//! dispatching to the pipeline, error mapping and access logging.

use crate::config::AppState;
use crate::error::ServeError;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body as _, Bytes};
use hyper::header::{self, HeaderMap};
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Raw URL path, still percent-encoded
    pub path: String,
    pub version: Version,
    pub is_head: bool,
    pub host: Option<String>,
    pub referer: Option<String>,
    pub accept: Option<String>,
    pub accept_encoding: Option<String>,
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<String>,
    pub user_agent: Option<String>,
}

impl RequestContext {
    /// Capture everything the pipeline needs from the request head
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let headers = req.headers();
        let host = header_string(headers, header::HOST.as_str())
            .or_else(|| req.uri().authority().map(ToString::to_string));
        // Both spellings are seen in the wild
        let referer =
            header_string(headers, "referer").or_else(|| header_string(headers, "referrer"));

        Self {
            method: req.method().clone(),
            path: req.uri().path().to_string(),
            version: req.version(),
            is_head: req.method() == Method::HEAD,
            host,
            referer,
            accept: header_string(headers, "accept"),
            accept_encoding: header_string(headers, "accept-encoding"),
            if_none_match: header_string(headers, "if-none-match"),
            if_modified_since: header_string(headers, "if-modified-since"),
            user_agent: header_string(headers, "user-agent"),
        }
    }

    /// Whether the client asked for a JSON directory listing
    pub fn wants_json(&self) -> bool {
        self.accept
            .as_deref()
            .is_some_and(|accept| accept.contains("application/json"))
    }
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    state: Arc<AppState>,
    peer: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let ctx = RequestContext::from_request(&req);
    Ok(respond(ctx, &state, peer).await)
}

/// Produce the response for one request; never fails
pub async fn respond(ctx: RequestContext, state: &AppState, peer: SocketAddr) -> Response<Full<Bytes>> {
    let started = Instant::now();

    let response = match check_http_method(&ctx.method) {
        Some(resp) => resp,
        None => match static_files::serve(&ctx, state).await {
            Ok(resp) => resp,
            Err(err) => error_response(&ctx, &err),
        },
    };

    if state.config.logging.access_log {
        log_access(&ctx, &response, peer, started, &state.config.logging.access_log_format);
    }
    response
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Map a pipeline failure onto its fixed response
fn error_response(ctx: &RequestContext, err: &ServeError) -> Response<Full<Bytes>> {
    if err.is_client_error() {
        logger::log_warning(&format!("{} {}: {err}", ctx.method, ctx.path));
        http::build_404_response()
    } else {
        if !matches!(err, ServeError::Favicon) {
            logger::log_error(&format!("{} {}: {err}", ctx.method, ctx.path));
        }
        http::build_500_response()
    }
}

fn log_access(
    ctx: &RequestContext,
    response: &Response<Full<Bytes>>,
    peer: SocketAddr,
    started: Instant,
    format: &str,
) {
    let mut entry = AccessLogEntry::new(peer.ip().to_string(), ctx.method.to_string(), ctx.path.clone());
    entry.http_version = match ctx.version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2.0",
        _ => "1.1",
    }
    .to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response
        .body()
        .size_hint()
        .exact()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    entry.referer.clone_from(&ctx.referer);
    entry.user_agent.clone_from(&ctx.user_agent);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    logger::log_access(&entry, format);
}
