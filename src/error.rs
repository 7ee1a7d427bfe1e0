//! Request-level error type
//!
//! Every failure inside the response pipeline is expressed as a `ServeError`.
//! The router converts it into a status code and a fixed body; the error text
//! itself only ever reaches the log.

use hyper::StatusCode;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServeError {
    /// Resolved path does not exist under the document root
    #[error("no such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    /// Request path climbs above the document root, or a symlink leads out of it
    #[error("path escapes document root: {0}")]
    OutsideRoot(String),

    /// Percent-decoded request path is not valid UTF-8
    #[error("request path is not valid UTF-8: {0}")]
    InvalidPath(String),

    /// `/favicon.ico` is answered with the generic error page
    #[error("favicon requests are not served")]
    Favicon,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ServeError {
    /// Status code reported to the client
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) | Self::OutsideRoot(_) | Self::InvalidPath(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Favicon | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether the failure is the client's doing rather than the server's
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ServeError::NotFound(PathBuf::from("/srv/missing")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServeError::OutsideRoot("/../etc/passwd".to_string()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ServeError::Favicon.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let io_err = ServeError::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(io_err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!io_err.is_client_error());
    }
}
