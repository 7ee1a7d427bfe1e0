//! Static file serving module
//!
//! The response pipeline: resolves the target, then either lists a directory
//! or runs a file through cache negotiation, hotlink protection and
//! compression.

use crate::config::AppState;
use crate::error::ServeError;
use crate::handler::listing::{self, DirectoryListing};
use crate::handler::resolve::{self, TargetKind};
use crate::handler::router::RequestContext;
use crate::http::{self, cache, compression, hotlink, mime, CacheDecision};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::fs::Metadata;
use std::path::Path;
use tokio::fs;

/// Requests for this path always get the 500 page
pub const FAVICON_PATH: &str = "/favicon.ico";

/// Substituted for images embedded by foreign pages, relative to the root
pub const PLACEHOLDER_PATH: &str = "images/forbidden.jpg";

/// Serve one GET or HEAD request
pub async fn serve(
    ctx: &RequestContext,
    state: &AppState,
) -> Result<Response<Full<Bytes>>, ServeError> {
    if ctx.path == FAVICON_PATH {
        return Err(ServeError::Favicon);
    }

    let target = resolve::resolve(&ctx.path, &state.root).await?;
    match target.kind {
        TargetKind::Missing => Err(ServeError::NotFound(target.path)),
        TargetKind::Directory(_) => serve_directory(ctx, &target.path).await,
        TargetKind::File(metadata) => serve_file(ctx, state, &target.path, &metadata).await,
    }
}

/// Render the entries of a directory
async fn serve_directory(
    ctx: &RequestContext,
    dir: &Path,
) -> Result<Response<Full<Bytes>>, ServeError> {
    let names = listing::read_entries(dir).await?;
    let listing = DirectoryListing::new(&resolve::decode_path(&ctx.path)?, names);

    if ctx.wants_json() {
        let body = listing::render_json(&listing).map_err(std::io::Error::from)?;
        return Ok(http::response::build_document_response(
            body,
            "application/json",
            ctx.is_head,
        ));
    }

    let html = listing::render_html(&listing);
    Ok(http::response::build_document_response(
        html.into_bytes(),
        "text/html; charset=utf-8",
        ctx.is_head,
    ))
}

/// Serve a regular file
///
/// The file is read once; the same bytes feed the `ETag` and the body.
async fn serve_file(
    ctx: &RequestContext,
    state: &AppState,
    path: &Path,
    metadata: &Metadata,
) -> Result<Response<Full<Bytes>>, ServeError> {
    let content = fs::read(path).await?;
    let modified = metadata.modified()?;

    let cache_headers = match cache::negotiate(
        ctx.if_none_match.as_deref(),
        ctx.if_modified_since.as_deref(),
        &content,
        modified,
        state.config.site.max_age,
    ) {
        CacheDecision::NotModified => return Ok(http::build_304_response()),
        CacheDecision::Fresh(headers) => headers,
    };

    let content_type = mime::content_type_for(path);

    if !hotlink::is_allowed(
        ctx.referer.as_deref(),
        ctx.host.as_deref(),
        content_type,
        &state.whitelist,
    ) {
        logger::log_hotlink_blocked(&ctx.path, ctx.referer.as_deref().unwrap_or("-"));
        return serve_placeholder(ctx, &state.root).await;
    }

    let encoding = compression::choose(ctx.accept_encoding.as_deref());
    let body = compression::compress(&content, encoding)?;

    Ok(http::response::build_file_response(
        body,
        content_type,
        encoding,
        &cache_headers,
        ctx.is_head,
    ))
}

async fn serve_placeholder(
    ctx: &RequestContext,
    root: &Path,
) -> Result<Response<Full<Bytes>>, ServeError> {
    let data = fs::read(root.join(PLACEHOLDER_PATH)).await?;
    Ok(http::response::build_placeholder_response(data, ctx.is_head))
}
