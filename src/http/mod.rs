//! HTTP protocol layer module
//!
//! Protocol-level building blocks of the response pipeline: cache
//! negotiation, content types, compression, hotlink checks and response
//! builders. Nothing here touches the filesystem.

pub mod cache;
pub mod compression;
pub mod hotlink;
pub mod mime;
pub mod response;

// Re-export commonly used types
pub use cache::{CacheDecision, CacheHeaders};
pub use compression::Encoding;
pub use response::{
    build_304_response, build_404_response, build_405_response, build_500_response,
    build_options_response,
};
