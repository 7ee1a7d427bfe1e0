//! Request handler module
//!
//! Request routing dispatch, path resolution, directory listings and the
//! static file pipeline.

pub mod listing;
pub mod resolve;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
