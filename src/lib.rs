//! yass: a small static file server
//!
//! Serves a document root over HTTP/1.1 with content-hash `ETag`s, strong
//! cache headers, gzip/deflate compression, directory listings and image
//! hotlink protection.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
