//! Request path resolution
//!
//! Maps a URL path onto the document root and classifies the target with a
//! single status lookup.

use percent_encoding::percent_decode_str;
use std::fs::Metadata;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::error::ServeError;

/// What a request path points at
#[derive(Debug)]
pub enum TargetKind {
    File(Metadata),
    Directory(Metadata),
    Missing,
}

/// A request path mapped onto the filesystem
#[derive(Debug)]
pub struct ResolvedTarget {
    pub path: PathBuf,
    pub kind: TargetKind,
}

/// Resolve `url_path` below `root`
///
/// `root` must already be canonical. Query and fragment are ignored, the path
/// is percent-decoded and `..` segments may not climb above the root. The
/// kind is decided from one `metadata` call and never re-checked.
pub async fn resolve(url_path: &str, root: &Path) -> Result<ResolvedTarget, ServeError> {
    let relative = normalize(url_path)?;
    let path = root.join(relative);

    let metadata = match fs::metadata(&path).await {
        Ok(m) => m,
        // A file used as a directory (`/file.txt/child`) is just as absent
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            return Ok(ResolvedTarget {
                path,
                kind: TargetKind::Missing,
            });
        }
        Err(e) => return Err(ServeError::Io(e)),
    };

    // Symlinks inside the root may still point outside of it
    let canonical = fs::canonicalize(&path).await?;
    if !canonical.starts_with(root) {
        return Err(ServeError::OutsideRoot(url_path.to_string()));
    }

    let kind = if metadata.is_dir() {
        TargetKind::Directory(metadata)
    } else {
        TargetKind::File(metadata)
    };
    Ok(ResolvedTarget { path, kind })
}

/// Decode and lexically normalize a URL path into a root-relative path
pub fn normalize(url_path: &str) -> Result<PathBuf, ServeError> {
    let decoded = decode_path(url_path)?;

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(ServeError::OutsideRoot(url_path.to_string()));
                }
            }
            s if s.contains('\\') || s.contains('\0') => {
                return Err(ServeError::OutsideRoot(url_path.to_string()));
            }
            s => segments.push(s),
        }
    }

    Ok(segments.iter().collect())
}

/// Strip query and fragment, then percent-decode
pub fn decode_path(url_path: &str) -> Result<String, ServeError> {
    let end = url_path.find(['?', '#']).unwrap_or(url_path.len());
    percent_decode_str(&url_path[..end])
        .decode_utf8()
        .map(std::borrow::Cow::into_owned)
        .map_err(|_| ServeError::InvalidPath(url_path.to_string()))
}
